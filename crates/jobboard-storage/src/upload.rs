//! Unsigned upload endpoint backend.
//!
//! Posts the file as multipart form data together with a named upload preset
//! and reads the public URL from the `secure_url` field of the JSON reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::resume::{ResumeStore, ResumeUpload};

/// Upload preset used when none is configured.
pub const DEFAULT_UPLOAD_PRESET: &str = "job_portal_resumes";

/// Configuration for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadEndpointConfig {
    /// Endpoint accepting multipart `file` + `upload_preset`
    pub url: String,
    /// Named upload profile
    pub upload_preset: String,
    pub timeout: Duration,
}

impl UploadEndpointConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let url = std::env::var("RESUME_UPLOAD_URL")
            .map_err(|_| StorageError::config_error("RESUME_UPLOAD_URL not set"))?;
        url::Url::parse(&url)
            .map_err(|e| StorageError::config_error(format!("RESUME_UPLOAD_URL is invalid: {}", e)))?;

        Ok(Self {
            url,
            upload_preset: std::env::var("RESUME_UPLOAD_PRESET")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_UPLOAD_PRESET.to_string()),
            timeout: Duration::from_secs(
                std::env::var("RESUME_UPLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Client for the external upload endpoint.
#[derive(Clone)]
pub struct UploadEndpointClient {
    http: Client,
    config: UploadEndpointConfig,
}

impl UploadEndpointClient {
    pub fn new(config: UploadEndpointConfig) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jobboard-storage/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> StorageResult<Self> {
        Self::new(UploadEndpointConfig::from_env()?)
    }
}

#[async_trait]
impl ResumeStore for UploadEndpointClient {
    async fn upload(&self, user_id: &str, resume: &ResumeUpload) -> StorageResult<String> {
        let content_type = resume
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let part = Part::bytes(resume.bytes.clone())
            .file_name(resume.safe_file_name())
            .mime_str(&content_type)
            .map_err(|e| StorageError::upload_failed(format!("invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());

        debug!("Uploading résumé for {} ({} bytes)", user_id, resume.bytes.len());
        let response = self.http.post(&self.config.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload_failed(format!(
                "upload endpoint returned {}: {}",
                status,
                &body[..body.len().min(200)]
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;
        let url = body
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StorageError::InvalidResponse("missing secure_url".to_string()))?;

        info!("Uploaded résumé for {}", user_id);
        Ok(url)
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        // any HTTP answer means the endpoint is reachable
        self.http.head(&self.config.url).send().await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "upload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> UploadEndpointClient {
        UploadEndpointClient::new(UploadEndpointConfig {
            url: format!("{}/v1_1/demo/raw/upload", server.uri()),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn resume() -> ResumeUpload {
        ResumeUpload::new("cv.pdf", Some("application/pdf".to_string()), b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/raw/upload"))
            .and(body_string_contains("job_portal_resumes"))
            .and(body_string_contains("name=\"file\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://cdn.example.com/raw/upload/cv.pdf"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client(&server).upload("U1", &resume()).await.unwrap();
        assert_eq!(url, "https://cdn.example.com/raw/upload/cv.pdf");
    }

    #[tokio::test]
    async fn test_upload_without_secure_url_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let err = client(&server).upload("U1", &resume()).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_error_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad preset"))
            .mount(&server)
            .await;

        let err = client(&server).upload("U1", &resume()).await.unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(!err.is_rejected_file());
    }

    #[test]
    #[serial]
    fn test_config_defaults_preset() {
        std::env::set_var("RESUME_UPLOAD_URL", "https://api.example.com/upload");
        std::env::remove_var("RESUME_UPLOAD_PRESET");
        let config = UploadEndpointConfig::from_env().unwrap();
        assert_eq!(config.upload_preset, "job_portal_resumes");
    }

    #[test]
    #[serial]
    fn test_config_rejects_invalid_url() {
        std::env::set_var("RESUME_UPLOAD_URL", "not a url");
        assert!(UploadEndpointConfig::from_env().is_err());
        std::env::remove_var("RESUME_UPLOAD_URL");
    }
}
