//! Résumé files and the storage backend seam.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Default upper bound on résumé size (5 MiB).
pub const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Accepted résumé formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

impl ResumeFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Declared content types compatible with this format.
    fn accepts_content_type(&self, declared: &str) -> bool {
        let declared = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        declared.is_empty() || declared == "application/octet-stream" || declared == self.content_type()
    }
}

/// A résumé received from an applicant.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Check format and size.
    pub fn validate(&self, max_bytes: usize) -> StorageResult<ResumeFormat> {
        if self.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if self.bytes.len() > max_bytes {
            return Err(StorageError::TooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            });
        }

        let format = ResumeFormat::from_file_name(&self.file_name)
            .ok_or_else(|| StorageError::UnsupportedType(self.file_name.clone()))?;

        if let Some(declared) = &self.content_type {
            if !format.accepts_content_type(declared) {
                return Err(StorageError::UnsupportedType(declared.clone()));
            }
        }

        Ok(format)
    }

    /// File name reduced to `[A-Za-z0-9._-]`.
    pub fn safe_file_name(&self) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if cleaned.trim_matches(['.', '_']).is_empty() {
            "resume".to_string()
        } else {
            cleaned
        }
    }

    /// Object key: `resumes/{user_id}/{random}-{file_name}`.
    pub fn object_key(&self, user_id: &str) -> String {
        format!(
            "resumes/{}/{}-{}",
            user_id,
            Uuid::new_v4().simple(),
            self.safe_file_name()
        )
    }
}

/// Backend that stores a résumé and returns its public URL.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Store a validated résumé for `user_id`; returns the public URL.
    async fn upload(&self, user_id: &str, resume: &ResumeUpload) -> StorageResult<String>;

    /// Check the backend is reachable.
    async fn check_connectivity(&self) -> StorageResult<()>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
