//! Administrator console.
//!
//! Each admin gets a console holding the job list and the applications
//! loaded per job. Loaded buckets are reused for the life of the process.
//! Local state only changes after the matching remote write succeeded.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use jobboard_models::{
    without_job, Application, ApplicationCache, ApplicationId, ApplicationStatus, Job, JobId,
    UserProfile,
};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::store::{ApplicationStore, JobStore};

/// One admin's console state.
#[derive(Debug, Default)]
pub struct AdminConsole {
    /// `None` until the job list has been read.
    pub jobs: Option<Vec<Job>>,
    pub applications: ApplicationCache,
}

/// Consoles keyed by admin uid.
#[derive(Default)]
pub struct AdminConsoleRegistry {
    consoles: RwLock<HashMap<String, Arc<Mutex<AdminConsole>>>>,
}

impl AdminConsoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the console for an admin.
    pub async fn console(&self, admin_uid: &str) -> Arc<Mutex<AdminConsole>> {
        {
            let consoles = self.consoles.read().await;
            if let Some(console) = consoles.get(admin_uid) {
                return Arc::clone(console);
            }
        }

        let mut consoles = self.consoles.write().await;
        Arc::clone(consoles.entry(admin_uid.to_string()).or_default())
    }
}

#[derive(Clone)]
pub struct AdminConsoleService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    registry: Arc<AdminConsoleRegistry>,
}

impl AdminConsoleService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        registry: Arc<AdminConsoleRegistry>,
    ) -> Self {
        Self {
            jobs,
            applications,
            registry,
        }
    }

    /// Refresh the console's job list. A failed read yields an empty list.
    pub async fn load_jobs(&self, admin: &UserProfile) -> Vec<Job> {
        let jobs = match self.jobs.list().await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!(admin = %admin.uid, "Failed to load jobs: {}", e);
                return Vec::new();
            }
        };

        let console = self.registry.console(&admin.uid).await;
        console.lock().await.jobs = Some(jobs.clone());
        jobs
    }

    /// Applications for a job, from the cache when already loaded.
    ///
    /// A failed read yields an empty list and leaves the bucket unloaded.
    pub async fn applications_for(&self, admin: &UserProfile, job_id: &JobId) -> Vec<Application> {
        let console = self.registry.console(&admin.uid).await;
        let mut console = console.lock().await;

        if let Some(cached) = console.applications.get(job_id) {
            return cached.to_vec();
        }

        match self.applications.list_by_job(job_id).await {
            Ok(applications) => {
                console.applications = std::mem::take(&mut console.applications)
                    .with_bucket(job_id.clone(), applications.clone());
                applications
            }
            Err(e) => {
                error!(job_id = %job_id.as_str(), "Failed to load applications: {}", e);
                Vec::new()
            }
        }
    }

    /// Delete a job and drop it from the console listing.
    ///
    /// Applications for the job are left in place.
    pub async fn delete_job(&self, admin: &UserProfile, job_id: &JobId) -> ApiResult<Vec<Job>> {
        match self.jobs.get(job_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ApiError::not_found("Job not found")),
            Err(e) => {
                error!(job_id = %job_id.as_str(), "Failed to read job before delete: {}", e);
                return Err(ApiError::internal("Failed to delete job."));
            }
        }

        let console = self.registry.console(&admin.uid).await;
        let mut console = console.lock().await;

        if console.jobs.is_none() {
            let jobs = self.jobs.list().await.map_err(|e| {
                error!(admin = %admin.uid, "Failed to load jobs before delete: {}", e);
                ApiError::internal("Failed to delete job.")
            })?;
            console.jobs = Some(jobs);
        }

        if let Err(e) = self.jobs.delete(job_id).await {
            error!(job_id = %job_id.as_str(), "Failed to delete job: {}", e);
            return Err(ApiError::internal("Failed to delete job."));
        }

        info!(admin = %admin.uid, job_id = %job_id.as_str(), "Deleted job");
        metrics::record_job_deleted();

        let remaining = without_job(console.jobs.take().unwrap_or_default(), job_id);
        console.jobs = Some(remaining.clone());
        Ok(remaining)
    }

    /// Set an application's status, then patch every loaded bucket.
    ///
    /// Returns the patched record when it is loaded in this console.
    pub async fn update_status(
        &self,
        admin: &UserProfile,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> ApiResult<Option<Application>> {
        match self.applications.update_status(id, status).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(application_id = %id.as_str(), "Status update for unknown application");
                return Err(ApiError::not_found("Application not found"));
            }
            Err(e) => {
                error!(application_id = %id.as_str(), "Failed to update status: {}", e);
                return Err(ApiError::internal("Failed to update application status."));
            }
        }

        info!(
            admin = %admin.uid,
            application_id = %id.as_str(),
            status = %status,
            "Updated application status"
        );
        metrics::record_status_update(status.as_str());

        let console = self.registry.console(&admin.uid).await;
        let mut console = console.lock().await;
        console.applications = std::mem::take(&mut console.applications).with_status(id, status);
        Ok(console.applications.find(id).cloned())
    }
}
