//! Repository for `applications/{id}`.

use std::collections::HashMap;

use tracing::{info, warn};

use jobboard_models::{Application, ApplicationId, ApplicationStatus, JobId, NewApplication};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, StructuredQuery, ToFirestoreValue, Value};

pub const APPLICATIONS_COLLECTION: &str = "applications";

/// Repository for job applications.
#[derive(Clone)]
pub struct ApplicationRepository {
    client: FirestoreClient,
}

impl ApplicationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Applications submitted by one user.
    pub async fn list_by_user(&self, user_id: &str) -> FirestoreResult<Vec<Application>> {
        self.query_equals("userId", user_id).await
    }

    /// Applications for one job.
    pub async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>> {
        self.query_equals("jobId", job_id.as_str()).await
    }

    async fn query_equals(&self, field: &str, value: &str) -> FirestoreResult<Vec<Application>> {
        let query =
            StructuredQuery::field_equals(APPLICATIONS_COLLECTION, field, value.to_firestore_value());
        let docs = self.client.run_query(query).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match document_to_application(doc) {
                Ok(app) => Some(app),
                Err(e) => {
                    warn!("Skipping unreadable application {:?}: {}", doc.name, e);
                    None
                }
            })
            .collect())
    }

    /// Store a new application with status `Pending` and a server `appliedAt`.
    ///
    /// Fails with [`FirestoreError::AlreadyExists`] when this applicant has
    /// already applied to the job.
    pub async fn create(&self, new: NewApplication) -> FirestoreResult<Application> {
        let response = self
            .client
            .create_document(
                APPLICATIONS_COLLECTION,
                new.id.as_str(),
                new_application_to_fields(&new),
                &["appliedAt"],
            )
            .await?;

        info!(
            "Created application {} for job {} by {}",
            new.id, new.job_id, new.user_id
        );

        Ok(new.into_application(response.server_timestamp()))
    }

    /// Set `status` on an existing application. Other fields are untouched.
    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_firestore_value());

        self.client
            .update_existing_document(
                APPLICATIONS_COLLECTION,
                id.as_str(),
                fields,
                vec!["status".to_string()],
            )
            .await?;

        info!("Application {} status set to {}", id, status);
        Ok(())
    }
}

// =============================================================================
// Conversion
// =============================================================================

fn new_application_to_fields(new: &NewApplication) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("jobId".to_string(), new.job_id.as_str().to_firestore_value());
    fields.insert("userId".to_string(), new.user_id.to_firestore_value());
    fields.insert("username".to_string(), new.username.to_firestore_value());
    fields.insert("email".to_string(), new.email.to_firestore_value());
    fields.insert("status".to_string(), new.status().as_str().to_firestore_value());
    if let Some(url) = &new.resume_url {
        fields.insert("resumeUrl".to_string(), url.to_firestore_value());
    }
    fields
}

fn document_to_application(doc: &Document) -> FirestoreResult<Application> {
    let id = doc
        .id()
        .map(ApplicationId::from)
        .ok_or_else(|| FirestoreError::invalid_response("Application document has no name"))?;

    let job_id = doc
        .get::<String>("jobId")
        .filter(|j| !j.is_empty())
        .ok_or_else(|| FirestoreError::invalid_response(format!("Application {} has no jobId", id)))?;

    Ok(Application {
        id,
        job_id: JobId::from(job_id),
        user_id: doc.get("userId").unwrap_or_default(),
        username: doc.get("username").unwrap_or_default(),
        email: doc.get("email").unwrap_or_default(),
        applied_at: doc.get("appliedAt").or_else(|| doc.created_at()),
        status: ApplicationStatus::from_stored(doc.get::<String>("status").as_deref()),
        resume_url: doc.get::<String>("resumeUrl").filter(|u| !u.is_empty()),
    })
}
