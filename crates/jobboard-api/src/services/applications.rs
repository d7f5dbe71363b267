//! Application submission.

use std::sync::Arc;

use tracing::{error, info, warn};

use jobboard_models::{Application, ApplicationId, JobId, NewApplication, UserProfile};
use jobboard_storage::{ResumeStore, ResumeUpload};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::store::{ApplicationStore, JobStore};

pub const ALREADY_APPLIED_MESSAGE: &str = "You have already applied for this job.";
pub const APPLICATION_SUBMITTED_MESSAGE: &str = "Application submitted successfully!";

#[derive(Clone)]
pub struct ApplicationService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    resumes: Arc<dyn ResumeStore>,
    max_resume_bytes: usize,
}

impl ApplicationService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        resumes: Arc<dyn ResumeStore>,
        max_resume_bytes: usize,
    ) -> Self {
        Self {
            jobs,
            applications,
            resumes,
            max_resume_bytes,
        }
    }

    /// Apply to a job, uploading the résumé first when one is attached.
    ///
    /// One application per (job, applicant); the stored record snapshots the
    /// applicant's username and email.
    pub async fn submit(
        &self,
        applicant: &UserProfile,
        job_id: &JobId,
        resume: Option<ResumeUpload>,
    ) -> ApiResult<Application> {
        if let Some(resume) = &resume {
            resume
                .validate(self.max_resume_bytes)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
        }

        match self.jobs.get(job_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ApiError::not_found("Job not found.")),
            Err(e) => {
                error!(job_id = %job_id.as_str(), "Failed to read job: {}", e);
                return Err(ApiError::internal("Failed to submit application."));
            }
        }

        let id = ApplicationId::for_applicant(job_id, &applicant.uid);
        // records written under older random ids only match on job id
        match self.applications.list_by_user(&applicant.uid).await {
            Ok(existing) if existing.iter().any(|a| &a.job_id == job_id) => {
                return Err(ApiError::conflict(ALREADY_APPLIED_MESSAGE));
            }
            Ok(_) => {}
            // the create precondition still rejects duplicates
            Err(e) => warn!(application_id = %id.as_str(), "Duplicate check failed: {}", e),
        }

        let resume_url = match &resume {
            Some(resume) => Some(self.resumes.upload(&applicant.uid, resume).await.map_err(|e| {
                error!(
                    uid = %applicant.uid,
                    backend = self.resumes.backend(),
                    "Résumé upload failed: {}",
                    e
                );
                ApiError::internal("Failed to upload résumé.")
            })?),
            None => None,
        };

        let new = NewApplication::new(
            job_id.clone(),
            &applicant.uid,
            &applicant.username,
            applicant.email_or_default(),
            resume_url,
        );

        let application = match self.applications.create(new).await {
            Ok(application) => application,
            Err(e) if e.is_already_exists() => {
                return Err(ApiError::conflict(ALREADY_APPLIED_MESSAGE));
            }
            Err(e) => {
                error!(application_id = %id.as_str(), "Failed to store application: {}", e);
                return Err(ApiError::internal("Failed to submit application."));
            }
        };

        info!(
            application_id = %application.id.as_str(),
            job_id = %job_id.as_str(),
            "Application submitted"
        );
        metrics::record_application_submitted(application.resume_url.is_some());

        Ok(application)
    }
}
