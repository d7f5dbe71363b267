//! Repository for `jobs/{id}`.

use std::collections::HashMap;

use tracing::{info, warn};

use jobboard_models::{Job, JobId, JobType, SalaryRange};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, ToFirestoreValue, Value};

pub const JOBS_COLLECTION: &str = "jobs";

/// Repository for job postings.
#[derive(Clone)]
pub struct JobRepository {
    client: FirestoreClient,
}

impl JobRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// All jobs. Documents that cannot be read are skipped.
    pub async fn list(&self) -> FirestoreResult<Vec<Job>> {
        let docs = self.client.list_all_documents(JOBS_COLLECTION).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match document_to_job(doc, None) {
                Ok(job) => Some(job),
                Err(e) => {
                    warn!("Skipping unreadable job document {:?}: {}", doc.name, e);
                    None
                }
            })
            .collect())
    }

    pub async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        let doc = self
            .client
            .get_document(JOBS_COLLECTION, job_id.as_str())
            .await?;

        doc.map(|d| document_to_job(&d, Some(job_id))).transpose()
    }

    /// Store a new job. `createdAt` is assigned by the server and returned.
    pub async fn create(&self, job: &Job) -> FirestoreResult<Job> {
        let response = self
            .client
            .create_document(
                JOBS_COLLECTION,
                job.id.as_str(),
                job_to_fields(job),
                &["createdAt"],
            )
            .await?;

        info!("Created job {} by {}", job.id, job.created_by);

        Ok(Job {
            created_at: response.server_timestamp(),
            ..job.clone()
        })
    }

    /// Hard delete with no cascade to applications.
    pub async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        self.client
            .delete_document(JOBS_COLLECTION, job_id.as_str())
            .await?;
        info!("Deleted job {}", job_id);
        Ok(())
    }
}

// =============================================================================
// Conversion
// =============================================================================

fn job_to_fields(job: &Job) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), job.title.to_firestore_value());
    fields.insert("company".to_string(), job.company.to_firestore_value());
    fields.insert("location".to_string(), job.location.to_firestore_value());
    fields.insert("description".to_string(), job.description.to_firestore_value());
    fields.insert("createdBy".to_string(), job.created_by.to_firestore_value());

    if let Some(job_type) = &job.job_type {
        fields.insert("jobType".to_string(), job_type.as_str().to_firestore_value());
    }
    if let Some(min) = job.salary.min {
        fields.insert("salaryMin".to_string(), min.to_firestore_value());
    }
    if let Some(max) = job.salary.max {
        fields.insert("salaryMax".to_string(), max.to_firestore_value());
    }
    if let Some(level) = &job.experience_level {
        fields.insert("experienceLevel".to_string(), level.to_firestore_value());
    }
    if let Some(website) = &job.company_website {
        fields.insert("companyWebsite".to_string(), website.to_firestore_value());
    }
    fields
}

fn document_to_job(doc: &Document, job_id: Option<&JobId>) -> FirestoreResult<Job> {
    let id = match job_id {
        Some(id) => id.clone(),
        None => doc
            .id()
            .map(JobId::from)
            .ok_or_else(|| FirestoreError::invalid_response("Job document has no name"))?,
    };

    let text = |key: &str| doc.get::<String>(key).unwrap_or_default();
    let optional_text = |key: &str| doc.get::<String>(key).filter(|s| !s.trim().is_empty());

    Ok(Job {
        id,
        title: text("title"),
        company: text("company"),
        location: text("location"),
        job_type: doc.get::<String>("jobType").as_deref().and_then(JobType::parse),
        salary: SalaryRange::new(doc.get("salaryMin"), doc.get("salaryMax")),
        experience_level: optional_text("experienceLevel"),
        description: text("description"),
        company_website: optional_text("companyWebsite"),
        created_by: text("createdBy"),
        created_at: doc.get("createdAt").or_else(|| doc.created_at()),
    })
}
