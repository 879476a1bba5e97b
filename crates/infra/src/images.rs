//! Uploaded product image files.
//!
//! Images are addressed by relative storage keys (`products/<uuid>.<ext>`). A product's
//! `image_path` may instead hold an absolute URL, which is never touched here.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use stockroom_products::{ImageType, UploadedImage};

/// Folder (and key prefix) uploaded product images live under.
pub const PRODUCT_IMAGE_DIR: &str = "products";

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("unsupported image type")]
    UnsupportedType,

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("image io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an upload and return its storage key.
    async fn store(&self, image: &UploadedImage) -> Result<String, ImageStoreError>;

    async fn open(&self, key: &str) -> Result<Option<StoredImage>, ImageStoreError>;

    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), ImageStoreError>;
}

/// Image store on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ImageStoreError> {
        let rel = Path::new(key);
        let well_formed = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !well_formed {
            return Err(ImageStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, image: &UploadedImage) -> Result<String, ImageStoreError> {
        let kind = image.image_type().ok_or(ImageStoreError::UnsupportedType)?;
        let key = format!("{PRODUCT_IMAGE_DIR}/{}.{}", Uuid::now_v7(), kind.extension());

        tokio::fs::create_dir_all(self.root.join(PRODUCT_IMAGE_DIR)).await?;
        tokio::fs::write(self.resolve(&key)?, &image.bytes).await?;

        tracing::debug!(key = %key, bytes = image.bytes.len(), "stored product image");
        Ok(key)
    }

    async fn open(&self, key: &str) -> Result<Option<StoredImage>, ImageStoreError> {
        let path = self.resolve(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageType::from_extension)
            .map(ImageType::mime)
            .unwrap_or("application/octet-stream");
        Ok(Some(StoredImage {
            content_type,
            bytes,
        }))
    }

    async fn remove(&self, key: &str) -> Result<(), ImageStoreError> {
        match tokio::fs::remove_file(self.resolve(key)?).await {
            Ok(()) => {
                tracing::debug!(key = %key, "removed product image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Whether an `image_path` is an absolute web URL rather than a storage key.
pub fn is_external(image_path: &str) -> bool {
    let lower = image_path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Public URL for an `image_path`: absolute URLs pass through, keys get `public_prefix`.
pub fn image_url(image_path: &str, public_prefix: &str) -> String {
    if is_external(image_path) {
        image_path.to_string()
    } else {
        format!(
            "{}/{}",
            public_prefix.trim_end_matches('/'),
            image_path.trim_start_matches('/')
        )
    }
}
