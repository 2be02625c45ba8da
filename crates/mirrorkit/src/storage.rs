//! JSON and text file persistence for mirrored data
//!
//! Callers persist fetched API payloads around the fetch/rewrite cores;
//! these helpers keep that I/O uniform: UTF-8 everywhere, parent
//! directories created on write, and an optional pre-compressed `.gz`
//! sibling next to each JSON file so the mirror webserver can serve it
//! directly.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::{Compression, GzBuilder};
use serde::Serialize;
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file to load does not exist
    #[error("file {path} not found when loading json")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// I/O failure with the operation that was attempted
    #[error("I/O error during {operation}: {source}")]
    Io {
        /// What was being done
        operation: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding/decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(operation: impl Into<String>) -> impl FnOnce(std::io::Error) -> StorageError {
    let operation = operation.into();
    move |source| StorageError::Io { operation, source }
}

/// Options for [`save_json`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Single-line encoding without whitespace; default is 2-space pretty
    pub compact: bool,
    /// Also write a `<path>.gz` sibling (gzip mtime pinned to 0 so repeated
    /// runs over identical data produce identical bytes)
    pub with_gz: bool,
}

/// Loads a JSON file
///
/// # Errors
///
/// [`StorageError::NotFound`] when the path is not a file; otherwise I/O
/// or JSON errors from reading and parsing.
pub fn load_json(path: &Path) -> Result<serde_json::Value, StorageError> {
    if !path.is_file() {
        return Err(StorageError::NotFound {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(io_error(format!("read {}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

/// Saves a value as JSON, optionally with a gzip sibling
///
/// Parent directories are created as needed.
pub fn save_json<T: Serialize>(
    data: &T,
    path: &Path,
    options: SaveOptions,
) -> Result<(), StorageError> {
    let text = if options.compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };

    write_text(path, &text)?;

    if options.with_gz {
        let gz_path = gz_sibling(path);
        let file = fs::File::create(&gz_path)
            .map_err(io_error(format!("create {}", gz_path.display())))?;
        let mut encoder = GzBuilder::new().mtime(0).write(file, Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(io_error(format!("write {}", gz_path.display())))?;
        encoder
            .finish()
            .map_err(io_error(format!("finish {}", gz_path.display())))?;
    }

    Ok(())
}

/// Reads a UTF-8 text file
pub fn read_text(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(io_error(format!("read {}", path.display())))
}

/// Writes a UTF-8 text file, creating parent directories as needed
pub fn write_text(path: &Path, text: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(io_error(format!("create directory {}", parent.display())))?;
    }
    fs::write(path, text).map_err(io_error(format!("write {}", path.display())))
}

/// `<path>.gz`, preserving the original file name
fn gz_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let path = temp.path().join("data.json");
        let value = json!({"name": "demo", "count": 3, "unicode": "日本語"});

        save_json(&value, &path, SaveOptions::default()).expect("save should succeed");
        let loaded = load_json(&path).expect("load should succeed");

        assert_eq!(loaded, value);
    }

    #[test]
    fn test_pretty_is_indented_compact_is_not() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let value = json!({"a": [1, 2]});

        let pretty_path = temp.path().join("pretty.json");
        save_json(&value, &pretty_path, SaveOptions::default()).expect("save pretty");
        let pretty = read_text(&pretty_path).expect("read pretty");
        assert!(pretty.contains('\n'));

        let compact_path = temp.path().join("compact.json");
        let options = SaveOptions {
            compact: true,
            ..Default::default()
        };
        save_json(&value, &compact_path, options).expect("save compact");
        let compact = read_text(&compact_path).expect("read compact");
        assert_eq!(compact, "{\"a\":[1,2]}");
    }

    #[test]
    fn test_gz_sibling_matches_plain_file() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let path = temp.path().join("data.json");
        let value = json!({"payload": "x".repeat(256)});

        let options = SaveOptions {
            with_gz: true,
            ..Default::default()
        };
        save_json(&value, &path, options).expect("save with gz");

        let plain = read_text(&path).expect("read plain");
        let gz_file = fs::File::open(temp.path().join("data.json.gz")).expect("gz exists");
        let mut decoder = flate2::read::GzDecoder::new(gz_file);
        let mut decompressed = String::new();
        decoder
            .read_to_string(&mut decompressed)
            .expect("gz should decode");

        assert_eq!(decompressed, plain);
        // mtime pinned for reproducible bytes
        assert_eq!(decoder.header().expect("gzip header").mtime(), 0);
    }

    #[test]
    fn test_write_text_creates_parent_directories() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let path = temp.path().join("a/b/c.txt");

        write_text(&path, "nested").expect("write should create parents");
        assert_eq!(read_text(&path).expect("read back"), "nested");
    }

    #[test]
    fn test_load_json_missing_file() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let missing = temp.path().join("nope.json");

        let err = load_json(&missing).expect_err("missing file should fail");
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_load_json_invalid_content() {
        let temp = mirrorkit_testkit::temp_dir_in_workspace();
        let path = mirrorkit_testkit::write_fixture(temp.path(), "broken.json", "{not json");

        let err = load_json(&path).expect_err("invalid json should fail");
        assert!(matches!(err, StorageError::Json(_)));
    }
}
