// Media store - external image hosting behind a trait seam.
//
// Handlers only see `MediaStore`; which backend is used (the hosted
// Cloudinary-compatible API or the local filesystem store for dev runs)
// is decided by configuration at startup.

pub mod cloudinary;
pub mod local;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MediaConfig, MediaProvider};

pub use cloudinary::CloudinaryStore;
pub use local::LocalStore;

/// Durable reference returned by a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Missing media configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected response from image host: {0}")]
    BadResponse(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An external store that accepts a local temp file and returns a durable
/// URL plus an identifier usable for later deletion.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: &Path, folder: &str) -> Result<UploadedImage, MediaError>;
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Build the configured store
pub fn from_config(config: &MediaConfig) -> Result<Arc<dyn MediaStore>, MediaError> {
    match config.provider {
        MediaProvider::Cloudinary => Ok(Arc::new(CloudinaryStore::new(config)?)),
        MediaProvider::Local => Ok(Arc::new(LocalStore::new(config))),
    }
}
