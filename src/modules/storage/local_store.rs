//! Local filesystem storage for uploaded files
//!
//! Files are written to a flat directory under generated names of the form
//! `{uuid}-{sanitized original filename}` and served back by that name.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::shared::validation::{SAFE_FILENAME_REGEX, UNSAFE_FILENAME_CHARS};

/// Local filesystem store for uploaded files
pub struct LocalFileStore {
    directory: PathBuf,
}

impl LocalFileStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            directory: config.directory,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path recorded in the database for a stored filename
    pub fn stored_path(&self, filename: &str) -> String {
        self.directory.join(filename).display().to_string()
    }

    /// Create the storage directory if it does not exist yet.
    ///
    /// Idempotent; called at startup and again on every save.
    pub async fn ensure_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.directory).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create storage directory {}: {}",
                self.directory.display(),
                e
            ))
        })
    }

    /// Write uploaded content under a generated collision-resistant filename.
    ///
    /// Returns the generated filename. The file is opened with exclusive
    /// create, so a concurrent upload can never overwrite an existing one.
    pub async fn save(&self, original_filename: &str, data: &[u8]) -> Result<String> {
        self.ensure_directory().await?;

        let filename = format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_filename(original_filename)
        );
        let path = self.directory.join(&filename);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to create file {}: {}", path.display(), e))
            })?;

        file.write_all(data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        debug!(
            "File stored: name={}, size={} bytes",
            filename,
            data.len()
        );

        Ok(filename)
    }

    /// Read a stored file back as bytes with an inferred content type.
    ///
    /// Names that fail the safe-filename check are rejected before any
    /// filesystem access; a missing file maps to `NotFound`.
    pub async fn read(&self, filename: &str) -> Result<(Vec<u8>, String)> {
        if !SAFE_FILENAME_REGEX.is_match(filename) {
            return Err(AppError::BadRequest(format!(
                "Invalid filename: {}",
                filename
            )));
        }

        let path = self.directory.join(filename);

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("File not found".to_string()));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();

        Ok((data, content_type))
    }

    /// Delete a stored file.
    ///
    /// Used to clean up after a failed database insert.
    pub async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.directory.join(filename);
        fs::remove_file(&path).await.map_err(|e| {
            AppError::Storage(format!("Failed to remove file {}: {}", path.display(), e))
        })?;

        debug!("File removed: name={}", filename);

        Ok(())
    }
}

/// Sanitize a client-supplied filename for storage.
///
/// Keeps only the last path component, normalizes spaces to `-`, replaces
/// any remaining unsafe characters and trims leading/trailing dots and
/// hyphens so the result always passes the safe-filename check.
pub fn sanitize_filename(original: &str) -> String {
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let name = name.replace(' ', "-");
    let name = UNSAFE_FILENAME_CHARS.replace_all(&name, "-");
    let name = name.trim_matches(|c| c == '.' || c == '-');

    if name.is_empty() {
        "file".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (LocalFileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(StorageConfig {
            directory: dir.path().to_path_buf(),
        });
        (store, dir)
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report card.pdf"), "report-card.pdf");
        assert_eq!(sanitize_filename("notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename("a/b/c.pdf"), "c.pdf");
        assert_eq!(sanitize_filename("..\\..\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("weird%$name!.png"), "weird--name-.png");
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn test_save_and_read_round_trip() {
        let (store, _dir) = temp_store();

        let name = store.save("report card.pdf", b"hello").await.unwrap();
        assert!(!name.contains(' '));
        assert!(name.ends_with("report-card.pdf"));

        let (data, content_type) = store.read(&name).await.unwrap();
        assert_eq!(data, b"hello");
        assert_eq!(content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_same_original_name_stores_distinct_files() {
        let (store, _dir) = temp_store();

        let first = store.save("photo.png", b"one").await.unwrap();
        let second = store.save("photo.png", b"two").await.unwrap();
        assert_ne!(first, second);

        let (data, _) = store.read(&first).await.unwrap();
        assert_eq!(data, b"one");
        let (data, _) = store.read(&second).await.unwrap();
        assert_eq!(data, b"two");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let (store, _dir) = temp_store();

        let err = store.read("does-not-exist.pdf").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_rejects_unsafe_names() {
        let (store, _dir) = temp_store();

        let err = store.read("../secret").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = store.read(".hidden").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let (store, _dir) = temp_store();

        let name = store.save("gone.txt", b"bye").await.unwrap();
        store.remove(&name).await.unwrap();

        let err = store.read(&name).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
