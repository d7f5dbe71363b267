//! Job applications and their review status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{ApplicationId, JobId};

/// Review status of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ApplicationStatus {
    /// Submitted, not yet reviewed
    #[default]
    Pending,
    /// Accepted by an administrator
    Approved,
    /// Declined by an administrator
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Resolve a stored value. Missing or unrecognised values read as `Pending`.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Whether an administrator has made a decision.
    pub fn is_decided(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored application (`applications/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: String,
    /// Applicant's username at submission time.
    pub username: String,
    /// Applicant's email at submission time.
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

impl Application {
    /// Copy of this application with a different status; every other field is kept.
    pub fn with_status(self, status: ApplicationStatus) -> Self {
        Self { status, ..self }
    }
}

/// An application about to be written.
///
/// `applied_at` is assigned by the store at write time; `status` always
/// starts as `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub resume_url: Option<String>,
}

impl NewApplication {
    pub fn new(
        job_id: JobId,
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        resume_url: Option<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            id: ApplicationId::for_applicant(&job_id, &user_id),
            job_id,
            user_id,
            username: username.into(),
            email: email.into(),
            resume_url,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::Pending
    }

    /// The stored record once the write is confirmed.
    pub fn into_application(self, applied_at: Option<DateTime<Utc>>) -> Application {
        Application {
            id: self.id,
            job_id: self.job_id,
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            applied_at,
            status: ApplicationStatus::Pending,
            resume_url: self.resume_url,
        }
    }
}
