//! Applicant dashboard: applications joined with their jobs.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::{Application, ApplicationStatus};
use crate::ids::{ApplicationId, JobId};
use crate::job::{Job, SalaryRange};

/// Message shown when the user has no visible applications.
pub const EMPTY_DASHBOARD_MESSAGE: &str = "You have not applied for any jobs yet.";

/// Display fields taken from the job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobDisplay {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    pub salary: SalaryRange,
    pub salary_display: String,
}

impl From<&Job> for JobDisplay {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.as_ref().map(|t| t.as_str().to_string()),
            salary: job.salary,
            salary_display: job.salary.display(),
        }
    }
}

/// One dashboard row.
///
/// Application-owned fields sit at the top level; job fields live in `job`,
/// so a job record can never shadow the application's id or status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppliedJob {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub job: JobDisplay,
}

impl AppliedJob {
    pub fn new(application: Application, job: &Job) -> Self {
        Self {
            application_id: application.id,
            job_id: application.job_id,
            status: application.status,
            applied_at: application.applied_at,
            resume_url: application.resume_url,
            job: JobDisplay::from(job),
        }
    }
}

/// Join applications with their job lookups.
///
/// Input order is preserved. Pairs whose lookup found no job are dropped.
pub fn join_applied_jobs<I>(pairs: I) -> Vec<AppliedJob>
where
    I: IntoIterator<Item = (Application, Option<Job>)>,
{
    pairs
        .into_iter()
        .filter_map(|(application, job)| job.map(|job| AppliedJob::new(application, &job)))
        .collect()
}

/// Dashboard screen.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardView {
    pub applied_jobs: Vec<AppliedJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl DashboardView {
    pub fn from_rows(applied_jobs: Vec<AppliedJob>) -> Self {
        let empty_message = applied_jobs
            .is_empty()
            .then(|| EMPTY_DASHBOARD_MESSAGE.to_string());
        Self {
            applied_jobs,
            empty_message,
        }
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }
}
