//! Blob storage for uploaded media
//!
//! The service only keeps a locator string per media row; the bytes live
//! behind a [`BlobStore`]. [`LocalBlobStore`] writes them into a directory
//! that a static file server (or CDN origin) exposes under a public prefix.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Content types accepted for tweet media
pub const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported file type: {0}")]
    UnsupportedContentType(String),

    #[error("Uploaded file is empty")]
    EmptyPayload,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reject anything that is not a JPEG or PNG image.
pub fn validate_content_type(content_type: Option<&mime::Mime>) -> Result<(), StorageError> {
    match content_type {
        Some(ct) if ALLOWED_CONTENT_TYPES.contains(&ct.essence_str()) => Ok(()),
        Some(ct) => Err(StorageError::UnsupportedContentType(ct.to_string())),
        None => Err(StorageError::UnsupportedContentType(
            "missing content type".to_string(),
        )),
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Validate and store `bytes`, returning the locator to record.
    async fn put(
        &self,
        original_name: Option<&str>,
        content_type: Option<&mime::Mime>,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Remove a blob previously returned by [`BlobStore::put`].
    async fn delete(&self, locator: &str) -> Result<(), StorageError>;
}

/// Stores blobs as files in `root`; locators are `public_prefix + file name`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    fn stored_name(original_name: Option<&str>, content_type: Option<&mime::Mime>) -> String {
        let extension = original_name
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| {
                !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .unwrap_or_else(|| match content_type.map(|ct| ct.essence_str()) {
                Some("image/png") => "png".to_string(),
                _ => "jpg".to_string(),
            });

        format!("{}.{}", Uuid::new_v4().simple(), extension)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        original_name: Option<&str>,
        content_type: Option<&mime::Mime>,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        validate_content_type(content_type)?;
        if bytes.is_empty() {
            return Err(StorageError::EmptyPayload);
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let name = Self::stored_name(original_name, content_type);
        let path = self.root.join(&name);
        tokio::fs::write(&path, &bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "stored media blob");
        Ok(format!("{}{}", self.public_prefix, name))
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let name = locator.strip_prefix(&self.public_prefix).unwrap_or(locator);
        // Locators never contain directories; refuse anything that would escape root.
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a local blob locator: {}", locator),
            )));
        }

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> mime::Mime {
        mime::IMAGE_PNG
    }

    #[test]
    fn accepts_only_jpeg_and_png() {
        assert!(validate_content_type(Some(&mime::IMAGE_JPEG)).is_ok());
        assert!(validate_content_type(Some(&png())).is_ok());
        assert!(matches!(
            validate_content_type(Some(&mime::IMAGE_GIF)),
            Err(StorageError::UnsupportedContentType(_))
        ));
        assert!(validate_content_type(Some(&mime::TEXT_PLAIN)).is_err());
        assert!(validate_content_type(None).is_err());
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let with_params: mime::Mime = "image/png; charset=binary".parse().unwrap();
        assert!(validate_content_type(Some(&with_params)).is_ok());
    }

    #[tokio::test]
    async fn put_writes_file_and_returns_prefixed_locator() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/images/");

        let locator = store
            .put(Some("Cat.PNG"), Some(&png()), vec![1, 2, 3])
            .await
            .unwrap();

        assert!(locator.starts_with("/images/"));
        assert!(locator.ends_with(".png"));

        let name = locator.trim_start_matches("/images/");
        let stored = tokio::fs::read(dir.path().join(name)).await.unwrap();
        assert_eq!(stored, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn put_never_trusts_path_components_in_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/images/");

        let locator = store
            .put(Some("../../etc/passwd"), Some(&mime::IMAGE_JPEG), vec![9])
            .await
            .unwrap();

        let name = locator.trim_start_matches("/images/");
        assert!(!name.contains('/'));
        assert!(name.ends_with(".jpg"));
        assert!(dir.path().join(name).exists());
    }

    #[tokio::test]
    async fn put_rejects_bad_type_and_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/images/");

        let bad_type = store
            .put(Some("doc.pdf"), Some(&mime::APPLICATION_PDF), vec![1])
            .await;
        assert!(matches!(bad_type, Err(StorageError::UnsupportedContentType(_))));

        let empty = store.put(Some("a.png"), Some(&png()), Vec::new()).await;
        assert!(matches!(empty, Err(StorageError::EmptyPayload)));
    }

    #[tokio::test]
    async fn delete_removes_blob_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/images/");

        let locator = store.put(None, Some(&png()), vec![4]).await.unwrap();
        store.delete(&locator).await.unwrap();

        let name = locator.trim_start_matches("/images/");
        assert!(!dir.path().join(name).exists());

        store.delete(&locator).await.unwrap();
        assert!(store.delete("/images/../secret").await.is_err());
    }
}
