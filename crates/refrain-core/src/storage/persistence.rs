//! Library file persistence
//!
//! Handles saving and loading the library document to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/refrain/affirmation_data.json`
//! (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use crate::library::Library;

/// Persistence layer for the library document
///
/// The document is pretty-printed JSON with two-space indentation.
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the library file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the library from disk
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns `InvalidFormat` if the file is not a valid UTF-8 JSON library,
    /// and a read error if it exists but can't be read at all.
    pub fn load(&self) -> StorageResult<Option<Library>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_read(e, self.path.clone())),
        };

        let library = serde_json::from_slice(&content).map_err(|source| {
            StorageError::InvalidFormat {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!("Loaded library from {:?}", self.path);
        Ok(Some(library))
    }

    /// Save the library to disk using atomic write
    pub fn save(&self, library: &Library) -> StorageResult<()> {
        let bytes = to_pretty_json(library)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Saved library to {:?}", self.path);
        Ok(())
    }
}

/// Serialize with two-space indentation; non-ASCII text is written as-is
fn to_pretty_json<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(StorageError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory, so the rename below stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;
    use tempfile::TempDir;

    fn sample_library() -> Library {
        let mut library = Library::new();
        library.put_collection(
            "stoic",
            Collection::new(
                "Stoic Sayings",
                "quotes",
                vec![
                    "Waste no more time arguing what a good man should be".to_string(),
                    "Ça ira, whatever the weather brings".to_string(),
                ],
            )
            .with_description("Marcus and friends"),
        );
        library.next_line();
        library
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(temp_dir.path().join("library.json"));

        assert!(persistence.load().unwrap().is_none());

        let library = sample_library();
        persistence.save(&library).unwrap();
        assert!(persistence.path().exists());

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded, library);
    }

    #[test]
    fn test_file_is_pretty_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(temp_dir.path().join("library.json"));
        persistence.save(&sample_library()).unwrap();

        let content = fs::read_to_string(persistence.path()).unwrap();
        assert!(content.contains("\n  \"collections\": {"));
        assert!(content.contains("Ça ira"));
        assert!(!content.contains("\\u00c7"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, "{ \"collections\": [ oops").unwrap();

        let err = JsonPersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, b"{\"collections\": {\"\xff\xfe\": {}}}").unwrap();

        let err = JsonPersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_a_read_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores file modes
        if fs::read(&path).is_ok() {
            return;
        }

        let err = JsonPersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, r#"{"collections": {"x": {"title": 5}}}"#).unwrap();

        assert!(JsonPersistence::new(&path).load().is_err());
    }

    #[test]
    fn test_reads_original_document_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("affirmation_data.json");
        fs::write(
            &path,
            r#"{
  "collections": {
    "b_first": {"title": "B", "type": "poem", "lines": ["line one of b here"], "description": "d"},
    "a_second": {"title": "A", "type": "poem", "lines": ["line one of a here"], "description": "d"}
  },
  "history": [
    {"collection": "b_first", "title": "B", "line": "line one of b here", "index": 0},
    {"collection": "a_second", "title": "A", "line": "line one of a here", "index": "random"}
  ],
  "current_collection": "b_first",
  "current_index": 1
}"#,
        )
        .unwrap();

        let library = JsonPersistence::new(&path).load().unwrap().unwrap();
        let keys: Vec<_> = library.collections().keys().collect();
        assert_eq!(keys, vec!["b_first", "a_second"]);
        assert_eq!(library.history().len(), 2);
        assert_eq!(library.current_collection(), Some("b_first"));
        assert_eq!(library.current_index(), 1);
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(temp_dir.path().join("library.json"));

        persistence.save(&sample_library()).unwrap();
        persistence.save(&Library::new()).unwrap();

        assert_eq!(persistence.load().unwrap().unwrap(), Library::new());
        assert!(!temp_dir.path().join("library.tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }
}
