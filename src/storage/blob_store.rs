//! Content-addressed media storage
//!
//! Uploaded images and video are stored under their SHA-256 hash in a
//! two-level directory fanout, e.g. hash "abcd1234..." lands at
//! "blobs/ab/cd/abcd1234...". Re-uploading identical bytes is a no-op.

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Content-addressed blob store for uploaded media
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the store's root directory if needed.
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Blob store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Store data, returning its SHA-256 hash.
    ///
    /// Writes go to a temp file first and are renamed into place, so a
    /// crashed upload never leaves a half-written blob under a valid hash.
    pub async fn write(&self, data: &[u8]) -> Result<String> {
        let hash = Self::hash_of(data);

        if self.exists(&hash).await? {
            tracing::debug!("Blob already stored: {}", hash);
            return Ok(hash);
        }

        let path = self.blob_path(&hash);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(temp_path, &path).await?;

        tracing::debug!("Stored blob: {} ({} bytes)", hash, data.len());
        Ok(hash)
    }

    /// Read a blob back by hash.
    pub async fn read(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(hash);

        if !path.exists() {
            return Err(AppError::BlobStore(format!("Blob not found: {}", hash)));
        }

        let mut file = fs::File::open(&path).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;

        Ok(data)
    }

    pub async fn exists(&self, hash: &str) -> Result<bool> {
        Ok(self.blob_path(hash).exists())
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        // Hashes shorter than the fanout prefix cannot exist; route them to
        // a dead path instead of panicking on slicing.
        if hash.len() < 4 {
            return self.root.join("invalid").join(hash);
        }
        self.root.join(&hash[0..2]).join(&hash[2..4]).join(hash)
    }

    fn hash_of(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (BlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::new(temp_dir.path().join("blobs"));
        store.initialize().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (store, _temp) = create_test_store().await;

        let data = b"fake jpeg bytes";
        let hash = store.write(data).await.unwrap();

        let read_back = store.read(&hash).await.unwrap();
        assert_eq!(data, read_back.as_slice());
    }

    #[tokio::test]
    async fn test_identical_content_same_hash() {
        let (store, _temp) = create_test_store().await;

        let hash1 = store.write(b"same bytes").await.unwrap();
        let hash2 = store.write(b"same bytes").await.unwrap();

        assert_eq!(hash1, hash2);
    }

    #[tokio::test]
    async fn test_fanout_directories() {
        let (store, _temp) = create_test_store().await;

        let hash = store.write(b"fanout").await.unwrap();
        let path = store.blob_path(&hash);

        assert!(path.exists());
        assert_eq!(path.parent().unwrap().file_name().unwrap(), &hash[2..4]);
    }

    #[tokio::test]
    async fn test_read_missing_blob_fails() {
        let (store, _temp) = create_test_store().await;

        let result = store.read("deadbeef").await;
        assert!(result.is_err());
    }
}
