//! Store seams used by the services.
//!
//! The Firestore repositories implement these traits; tests substitute
//! mocks or in-memory stores.

use async_trait::async_trait;

use jobboard_firestore::{
    ApplicationRepository, FirestoreResult, JobRepository, UserRepository,
};
use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, Job, JobId, NewApplication, ProfileRecord, Role,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list(&self) -> FirestoreResult<Vec<Job>>;

    async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>>;

    /// Store a new job; the returned copy carries the server timestamp.
    async fn create(&self, job: &Job) -> FirestoreResult<Job>;

    async fn delete(&self, job_id: &JobId) -> FirestoreResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> FirestoreResult<Vec<Application>>;

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>>;

    /// Fails with `AlreadyExists` when the applicant already applied.
    async fn create(&self, application: NewApplication) -> FirestoreResult<Application>;

    async fn update_status(&self, id: &ApplicationId, status: ApplicationStatus) -> FirestoreResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, uid: &str) -> FirestoreResult<Option<ProfileRecord>>;

    async fn create(
        &self,
        uid: &str,
        email: Option<String>,
        username: &str,
        role: Role,
    ) -> FirestoreResult<()>;
}

#[async_trait]
impl JobStore for JobRepository {
    async fn list(&self) -> FirestoreResult<Vec<Job>> {
        JobRepository::list(self).await
    }

    async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        JobRepository::get(self, job_id).await
    }

    async fn create(&self, job: &Job) -> FirestoreResult<Job> {
        JobRepository::create(self, job).await
    }

    async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        JobRepository::delete(self, job_id).await
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn list_by_user(&self, user_id: &str) -> FirestoreResult<Vec<Application>> {
        ApplicationRepository::list_by_user(self, user_id).await
    }

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>> {
        ApplicationRepository::list_by_job(self, job_id).await
    }

    async fn create(&self, application: NewApplication) -> FirestoreResult<Application> {
        ApplicationRepository::create(self, application).await
    }

    async fn update_status(&self, id: &ApplicationId, status: ApplicationStatus) -> FirestoreResult<()> {
        ApplicationRepository::update_status(self, id, status).await
    }
}

#[async_trait]
impl ProfileStore for UserRepository {
    async fn get(&self, uid: &str) -> FirestoreResult<Option<ProfileRecord>> {
        UserRepository::get(self, uid).await
    }

    async fn create(
        &self,
        uid: &str,
        email: Option<String>,
        username: &str,
        role: Role,
    ) -> FirestoreResult<()> {
        UserRepository::create(self, uid, email.as_deref(), username, role).await
    }
}
