//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while storing résumés.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to configure storage client: {0}")]
    ConfigError(String),

    #[error("Résumé must be a PDF, DOC or DOCX file")]
    UnsupportedType(String),

    #[error("Résumé is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Résumé file is empty")]
    Empty,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Whether the file itself was rejected, as opposed to the backend failing.
    pub fn is_rejected_file(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType(_) | Self::TooLarge { .. } | Self::Empty
        )
    }
}
