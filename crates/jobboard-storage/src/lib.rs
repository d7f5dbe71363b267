//! Résumé storage.
//!
//! This crate provides:
//! - Résumé validation (format, size) and object naming
//! - The `ResumeStore` backend trait
//! - An unsigned multipart upload endpoint backend
//! - A Cloudflare R2 backend

pub mod error;
pub mod r2;
pub mod resume;
pub mod upload;

use std::sync::Arc;

pub use error::{StorageError, StorageResult};
pub use r2::{R2Client, R2Config};
pub use resume::{ResumeFormat, ResumeStore, ResumeUpload, DEFAULT_MAX_RESUME_BYTES};
pub use upload::{UploadEndpointClient, UploadEndpointConfig};

/// Build the backend named by `RESUME_STORAGE` (`upload`, the default, or `r2`).
pub fn resume_store_from_env() -> StorageResult<Arc<dyn ResumeStore>> {
    let backend = std::env::var("RESUME_STORAGE").unwrap_or_else(|_| "upload".to_string());

    match backend.to_ascii_lowercase().as_str() {
        "upload" | "" => Ok(Arc::new(UploadEndpointClient::from_env()?)),
        "r2" => Ok(Arc::new(R2Client::from_env()?)),
        other => Err(StorageError::config_error(format!(
            "Unknown RESUME_STORAGE backend: {}",
            other
        ))),
    }
}
