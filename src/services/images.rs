use std::path::PathBuf;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    error::{AppError, Result},
    models::product::ImageUpload,
};

/// Accepts an image buffer and returns a durable URL for it.
#[automock]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<String>;
}

/// Stores images on local disk, named by the BLAKE3 hash of their content.
///
/// Identical uploads map to the same file, so re-uploading an image never
/// creates a second copy.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    base_url: String,
}

impl LocalImageStore {
    /// Creates a new `LocalImageStore`.
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory images are written to.
    /// * `base_url` - The URL under which `dir` is served.
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        if image.bytes.is_empty() {
            return Err(AppError::Validation("Product image is required".to_string()));
        }

        let kind = infer::get(&image.bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| AppError::Validation("Uploaded file must be an image".to_string()))?;

        let file_name = format!("{}.{}", blake3::hash(&image.bytes).to_hex(), kind.extension());
        let path = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to prepare upload dir: {}", e)))?;
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            "🖼️ Stored image {} ({} bytes, {}) from {}",
            file_name,
            image.bytes.len(),
            kind.mime_type(),
            image.file_name
        );

        Ok(format!("{}/{}", self.base_url, file_name))
    }
}
