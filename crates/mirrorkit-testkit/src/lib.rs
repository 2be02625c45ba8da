//! Test utilities for mirrorkit
//!
//! This crate provides shared testing utilities used across the mirrorkit
//! workspace: centralized temporary directories and environment-variable
//! isolation for tests that exercise token lookup.

use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Environment variable holding the optional API token
const TOKEN_ENV_VAR: &str = "github_api_token";

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// This keeps all test temporary files in a single location that is
/// gitignored and easy to clean up manually if needed.
///
/// # Panics
///
/// Panics if the `.tmp/` base or the temporary subdirectory cannot be
/// created.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Runs a test with the API token environment variable set (or cleared)
///
/// Tests that exercise `github_api_token` lookup run in parallel with the
/// rest of the suite, so the variable is controlled under [`ENV_LOCK`] and
/// restored to its original value before returning.
///
/// # Arguments
///
/// * `token` - Value to set; `None` clears the variable
/// * `f` - Test closure
pub fn with_github_token<F, R>(token: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| {
        // Environment variables remain valid after another test's panic;
        // the mutex only serializes access.
        poisoned.into_inner()
    });

    let original = std::env::var(TOKEN_ENV_VAR).ok();

    // SAFETY: ENV_LOCK is held, so no other test mutates the environment
    // concurrently.
    unsafe {
        match token {
            Some(value) => std::env::set_var(TOKEN_ENV_VAR, value),
            None => std::env::remove_var(TOKEN_ENV_VAR),
        }
    }

    let result = f();

    // SAFETY: as above; restore whatever was there before.
    unsafe {
        match original {
            Some(value) => std::env::set_var(TOKEN_ENV_VAR, value),
            None => std::env::remove_var(TOKEN_ENV_VAR),
        }
    }

    result
}

/// Writes a file under `dir`, creating intermediate directories
///
/// Convenience for fixture setup in integration tests.
pub fn write_fixture(dir: &Path, relative: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_is_under_dot_tmp() {
        let temp = temp_dir_in_workspace();
        assert!(temp.path().to_string_lossy().contains(".tmp"));
    }

    #[test]
    fn test_with_github_token_sets_and_restores() {
        let before = std::env::var(TOKEN_ENV_VAR).ok();

        with_github_token(Some("inner"), || {
            assert_eq!(std::env::var(TOKEN_ENV_VAR).as_deref(), Ok("inner"));
        });

        assert_eq!(std::env::var(TOKEN_ENV_VAR).ok(), before);
    }

    #[test]
    fn test_with_github_token_clears() {
        with_github_token(None, || {
            assert!(std::env::var(TOKEN_ENV_VAR).is_err());
        });
    }

    #[test]
    fn test_write_fixture_creates_nested_file() {
        let temp = temp_dir_in_workspace();
        let path = write_fixture(temp.path(), "nested/dir/file.txt", "hello");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
