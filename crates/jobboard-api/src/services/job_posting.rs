//! Job submission.

use std::sync::Arc;

use tracing::{error, info};
use validator::Validate;

use jobboard_models::{Job, JobDraft, JobId, UserProfile};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{sanitize_description, sanitize_text, validate_website_url, visible_text};
use crate::services::store::JobStore;

#[derive(Clone)]
pub struct JobPostingService {
    jobs: Arc<dyn JobStore>,
}

impl JobPostingService {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }

    /// Validate and store a posting. Nothing is written unless every check
    /// passes.
    pub async fn post(&self, admin: &UserProfile, draft: JobDraft) -> ApiResult<Job> {
        draft.validate()?;

        if let Some(site) = draft
            .company_website
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            validate_website_url(site)
                .into_result()
                .map_err(|msg| ApiError::Validation(format!("company_website: {}", msg)))?;
        }

        let description = sanitize_description(&draft.description);
        if visible_text(&description).is_empty() {
            return Err(ApiError::Validation(
                "Please fill in all required fields: description".to_string(),
            ));
        }

        let job = Job::from_draft(JobId::new(), JobDraft { description, ..draft }, &admin.uid);

        let created = self.jobs.create(&job).await.map_err(|e| {
            error!(admin = %admin.uid, "Failed to post job: {}", e);
            ApiError::internal("Failed to post job.")
        })?;

        info!(
            admin = %admin.uid,
            job_id = %created.id.as_str(),
            title = %sanitize_text(&created.title),
            "Posted job"
        );
        metrics::record_job_posted();

        Ok(created)
    }
}
