//! Job listing and detail views.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use jobboard_models::{Job, JobId, ListingView, SalaryRange};

use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_description;
use crate::services::store::JobStore;

/// Full job as shown on the detail screen.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    pub salary: SalaryRange,
    pub salary_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Sanitized HTML
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobDetail {
    fn from(job: Job) -> Self {
        Self {
            salary_display: job.salary.display(),
            description: sanitize_description(&job.description),
            job_type: job.job_type.map(|t| t.as_str().to_string()),
            id: job.id,
            title: job.title,
            company: job.company,
            location: job.location,
            salary: job.salary,
            experience_level: job.experience_level,
            company_website: job.company_website,
            created_at: job.created_at,
        }
    }
}

#[derive(Clone)]
pub struct ListingService {
    jobs: Arc<dyn JobStore>,
}

impl ListingService {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }

    /// All jobs. A failed read yields the empty listing.
    pub async fn load_view(&self) -> ListingView {
        match self.jobs.list().await {
            Ok(jobs) => ListingView::from_jobs(&jobs),
            Err(e) => {
                error!("Failed to load jobs: {}", e);
                ListingView::empty()
            }
        }
    }

    pub async fn job_detail(&self, job_id: &JobId) -> ApiResult<JobDetail> {
        match self.jobs.get(job_id).await {
            Ok(Some(job)) => Ok(JobDetail::from(job)),
            Ok(None) => Err(ApiError::not_found("Job not found.")),
            Err(e) => {
                error!(job_id = %job_id.as_str(), "Failed to load job: {}", e);
                Err(ApiError::internal("Failed to load job."))
            }
        }
    }
}
