//! Applicant dashboard.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, error};

use jobboard_firestore::FirestoreResult;
use jobboard_models::{join_applied_jobs, AppliedJob, DashboardView};

use crate::services::store::{ApplicationStore, JobStore};

#[derive(Clone)]
pub struct DashboardService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl DashboardService {
    pub fn new(jobs: Arc<dyn JobStore>, applications: Arc<dyn ApplicationStore>) -> Self {
        Self { jobs, applications }
    }

    /// The user's applications joined with their jobs.
    ///
    /// Job lookups run concurrently; rows keep the order of the application
    /// query. Applications whose job no longer exists are dropped. Any failed
    /// read fails the whole load.
    pub async fn applied_jobs(&self, user_id: &str) -> FirestoreResult<Vec<AppliedJob>> {
        let applications = self.applications.list_by_user(user_id).await?;

        let jobs = try_join_all(applications.iter().map(|app| self.jobs.get(&app.job_id))).await?;

        let rows = join_applied_jobs(applications.into_iter().zip(jobs));
        debug!(user_id = %user_id, rows = rows.len(), "Loaded dashboard");
        Ok(rows)
    }

    pub async fn load_view(&self, user_id: &str) -> DashboardView {
        match self.applied_jobs(user_id).await {
            Ok(rows) => DashboardView::from_rows(rows),
            Err(e) => {
                error!(user_id = %user_id, "Failed to load dashboard: {}", e);
                DashboardView::empty()
            }
        }
    }
}
