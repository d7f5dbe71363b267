//! Security utilities for input validation and sanitization.
//!
//! This module provides:
//! - Company website validation (scheme check, internal address blocking)
//! - Allow-list HTML sanitization for job descriptions
//! - Document id checks for path parameters

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

/// Maximum URL length to prevent DoS attacks.
const MAX_URL_LENGTH: usize = 2048;

/// Maximum length of a Firestore document id we accept in a path.
const MAX_DOCUMENT_ID_LENGTH: usize = 128;

/// Application ids join a job id and a uid, each up to the document limit.
const MAX_APPLICATION_ID_LENGTH: usize = 2 * MAX_DOCUMENT_ID_LENGTH + 1;

/// Maximum length of free text kept for logging.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Blocked URL patterns (internal hosts and metadata endpoints).
static BLOCKED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://127\.",
        r"^https?://localhost",
        r"^https?://0\.0\.0\.0",
        r"^https?://10\.",
        r"^https?://172\.(1[6-9]|2[0-9]|3[0-1])\.",
        r"^https?://192\.168\.",
        r"^https?://169\.254\.",
        r"^https?://\[::1\]",
        r"^https?://\[fd",
        r"^https?://\[fe80",
        r"^https?://metadata\.",
        r"^https?://metadata\.google\.internal",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Result of URL validation.
#[derive(Debug)]
pub enum UrlValidationResult {
    /// URL is valid and allowed.
    Valid(String),
    /// URL is malformed or uses an unsupported protocol.
    Invalid(String),
    /// URL matches a blocked pattern (e.g., internal IPs).
    Blocked(String),
    /// URL exceeds maximum length.
    TooLong,
}

impl UrlValidationResult {
    /// Convert to Result for easy error handling.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Valid(url) => Ok(url),
            Self::Invalid(msg) | Self::Blocked(msg) => Err(msg),
            Self::TooLong => Err(format!(
                "URL exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            )),
        }
    }
}

/// Validate a company website link.
///
/// Only http and https are accepted, and links to internal or metadata
/// hosts are rejected. Any public domain is allowed.
pub fn validate_website_url(url: &str) -> UrlValidationResult {
    if url.len() > MAX_URL_LENGTH {
        return UrlValidationResult::TooLong;
    }

    let url = url.trim();
    if url.is_empty() {
        return UrlValidationResult::Invalid("URL cannot be empty".to_string());
    }

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => return UrlValidationResult::Invalid(format!("Invalid URL format: {}", e)),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return UrlValidationResult::Invalid(format!(
                "Invalid protocol '{}'. Only HTTP and HTTPS are allowed.",
                scheme
            ))
        }
    }

    if parsed.host_str().is_none() {
        return UrlValidationResult::Invalid("URL must have a valid domain".to_string());
    }

    let lowered = url.to_ascii_lowercase();
    if BLOCKED_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
        warn!(url = %url, "Blocked URL pattern detected");
        return UrlValidationResult::Blocked(
            "URL appears to target an internal or restricted endpoint".to_string(),
        );
    }

    UrlValidationResult::Valid(url.to_string())
}

/// Clean editor HTML down to the allow-listed tags and attributes.
///
/// Scripts, event handlers and `javascript:` links are removed; links get
/// `rel="noopener noreferrer"`.
pub fn sanitize_description(html: &str) -> String {
    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}

/// Text a reader would see once tags are stripped.
pub fn visible_text(html: &str) -> String {
    let text = match HTML_TAG.as_ref() {
        Some(tag) => tag.replace_all(html, " ").into_owned(),
        None => html.to_string(),
    };
    text.replace("&nbsp;", " ").trim().to_string()
}

/// Sanitize a user-provided string for safe logging.
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Validate a document id taken from a path.
///
/// Valid format: 1-128 ASCII alphanumerics, hyphens or underscores.
pub fn is_valid_document_id(id: &str) -> bool {
    has_id_shape(id, MAX_DOCUMENT_ID_LENGTH)
}

/// Validate an application id taken from a path (`{jobId}_{uid}` or a
/// generated id).
pub fn is_valid_application_id(id: &str) -> bool {
    has_id_shape(id, MAX_APPLICATION_ID_LENGTH)
}

fn has_id_shape(id: &str, max_len: usize) -> bool {
    if id.is_empty() || id.len() > max_len {
        return false;
    }
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
