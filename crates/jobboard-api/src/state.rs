//! Application state.

use std::sync::Arc;

use jobboard_firestore::{ApplicationRepository, FirestoreClient, JobRepository, UserRepository};
use jobboard_storage::{resume_store_from_env, ResumeStore};

use crate::auth::{IdTokenVerifier, JwksCache};
use crate::config::ApiConfig;
use crate::services::{
    AdminConsoleRegistry, AdminConsoleService, ApplicationService, ApplicationStore,
    DashboardService, JobPostingService, JobStore, ListingService, ProfileStore, SessionResolver,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: Arc<dyn JobStore>,
    pub resumes: Arc<dyn ResumeStore>,
    pub verifier: Arc<dyn IdTokenVerifier>,
    pub sessions: SessionResolver,
    pub listing: ListingService,
    pub dashboard: DashboardService,
    pub admin: AdminConsoleService,
    pub posting: JobPostingService,
    pub submissions: ApplicationService,
}

impl AppState {
    /// Create state backed by Firestore, the configured résumé backend and
    /// Google's token signing keys.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let firestore = FirestoreClient::from_env().await?;
        let resumes = resume_store_from_env()?;
        let jwks = JwksCache::new(firestore.project_id()).await?;

        Ok(Self::from_parts(
            config,
            Arc::new(JobRepository::new(firestore.clone())),
            Arc::new(ApplicationRepository::new(firestore.clone())),
            Arc::new(UserRepository::new(firestore)),
            resumes,
            Arc::new(jwks),
        ))
    }

    /// Wire services over the given stores.
    pub fn from_parts(
        config: ApiConfig,
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        profiles: Arc<dyn ProfileStore>,
        resumes: Arc<dyn ResumeStore>,
        verifier: Arc<dyn IdTokenVerifier>,
    ) -> Self {
        let submissions = ApplicationService::new(
            Arc::clone(&jobs),
            Arc::clone(&applications),
            Arc::clone(&resumes),
            config.max_resume_bytes,
        );

        Self {
            sessions: SessionResolver::new(profiles),
            listing: ListingService::new(Arc::clone(&jobs)),
            dashboard: DashboardService::new(Arc::clone(&jobs), Arc::clone(&applications)),
            admin: AdminConsoleService::new(
                Arc::clone(&jobs),
                applications,
                Arc::new(AdminConsoleRegistry::new()),
            ),
            posting: JobPostingService::new(Arc::clone(&jobs)),
            submissions,
            config,
            jobs,
            resumes,
            verifier,
        }
    }
}
