//! Rate-limit reporting seam
//!
//! The API client observes the remaining/total request budget on every
//! completed response and hands it to a [`RateLimitSink`]. Aggregation,
//! persistence or alerting is the sink implementor's business.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Rate-limit budget observed on a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Requests left in the current quota window
    pub remaining: u64,
    /// Total requests permitted per quota window
    pub limit: u64,
}

/// Receiver for rate-limit observations
pub trait RateLimitSink: Send + Sync {
    /// Called once per completed request with the observed budget
    fn record(&self, snapshot: RateLimitSnapshot);
}

/// Sink that keeps the tightest budget seen so far
///
/// "Tightest" means lowest `remaining`; a mirror run reports this single
/// number at the end to show how close it came to the quota.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    lowest: Mutex<Option<RateLimitSnapshot>>,
}

impl RateLimitTracker {
    /// Creates an empty tracker
    pub fn new() -> Self {
        RateLimitTracker::default()
    }

    /// The snapshot with the lowest `remaining` recorded so far
    pub fn lowest(&self) -> Option<RateLimitSnapshot> {
        *self
            .lowest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RateLimitSink for RateLimitTracker {
    fn record(&self, snapshot: RateLimitSnapshot) {
        let mut lowest = self
            .lowest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *lowest {
            Some(seen) if seen.remaining <= snapshot.remaining => {}
            _ => *lowest = Some(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tracker_starts_empty() {
        assert_eq!(RateLimitTracker::new().lowest(), None);
    }

    #[test]
    fn test_tracker_keeps_lowest_remaining() {
        let tracker = RateLimitTracker::new();
        tracker.record(RateLimitSnapshot {
            remaining: 4000,
            limit: 5000,
        });
        tracker.record(RateLimitSnapshot {
            remaining: 4500,
            limit: 5000,
        });
        tracker.record(RateLimitSnapshot {
            remaining: 100,
            limit: 5000,
        });
        tracker.record(RateLimitSnapshot {
            remaining: 3999,
            limit: 5000,
        });

        let lowest = tracker.lowest().expect("snapshots were recorded");
        assert_eq!(lowest.remaining, 100);
    }

    #[test]
    fn test_tracker_usable_as_trait_object() {
        let sink: Arc<dyn RateLimitSink> = Arc::new(RateLimitTracker::new());
        sink.record(RateLimitSnapshot {
            remaining: 1,
            limit: 60,
        });
    }

    #[test]
    fn test_tracker_concurrent_records() {
        let tracker = Arc::new(RateLimitTracker::new());
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    tracker.record(RateLimitSnapshot {
                        remaining: 100 + i,
                        limit: 5000,
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread should not panic");
        }
        assert_eq!(tracker.lowest().expect("recorded").remaining, 100);
    }
}
