//! Job postings and the job submission form.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::ids::JobId;

/// Message shown when the listing has nothing to display.
pub const EMPTY_LISTING_MESSAGE: &str = "No jobs available.";

/// Employment type of a posting.
///
/// Stored as free text; the four conventional values are recognised and
/// anything else is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobType {
    FullTime,
    PartTime,
    Remote,
    Contract,
    Other(String),
}

impl JobType {
    pub fn as_str(&self) -> &str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Remote => "Remote",
            JobType::Contract => "Contract",
            JobType::Other(s) => s,
        }
    }

    /// Parse stored text, returning `None` for blank input.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::from(trimmed.to_string()))
    }
}

impl From<String> for JobType {
    fn from(s: String) -> Self {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "full-time" | "fulltime" => JobType::FullTime,
            "part-time" | "parttime" => JobType::PartTime,
            "remote" => JobType::Remote,
            "contract" => JobType::Contract,
            _ => JobType::Other(s),
        }
    }
}

impl From<JobType> for String {
    fn from(t: JobType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Salary range; either bound may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SalaryRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl SalaryRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Human-readable range, or "N/A" unless both bounds are known.
    pub fn display(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("₹{} - ₹{}", min, max),
            _ => "N/A".to_string(),
        }
    }

    /// True when both bounds are present and min exceeds max.
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// A job posting stored in `jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub job_type: Option<JobType>,
    pub salary: SalaryRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Rich-text (HTML) description.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_website: Option<String>,
    /// UID of the administrator who posted the job.
    pub created_by: String,
    /// Server-assigned creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Build a job from a validated draft.
    pub fn from_draft(id: JobId, draft: JobDraft, created_by: impl Into<String>) -> Self {
        let salary = draft.salary();
        Self {
            id,
            title: draft.title.trim().to_string(),
            company: draft.company.trim().to_string(),
            location: draft.location.trim().to_string(),
            job_type: draft.job_type.as_deref().and_then(JobType::parse),
            salary,
            experience_level: non_blank(draft.experience_level),
            description: draft.description,
            company_website: non_blank(draft.company_website),
            created_by: created_by.into(),
            created_at: None,
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary::from(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Card shown on the listing and the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    pub salary: SalaryRange,
    pub salary_display: String,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.as_ref().map(|t| t.as_str().to_string()),
            salary: job.salary,
            salary_display: job.salary.display(),
        }
    }
}

/// Listing screen: all jobs, or an empty-state message.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListingView {
    pub jobs: Vec<JobSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl ListingView {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        if jobs.is_empty() {
            return Self::empty();
        }
        Self {
            jobs: jobs.iter().map(JobSummary::from).collect(),
            empty_message: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            jobs: Vec::new(),
            empty_message: Some(EMPTY_LISTING_MESSAGE.to_string()),
        }
    }
}

/// Job submission form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, JsonSchema)]
#[validate(schema(function = "validate_salary_range"))]
pub struct JobDraft {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub company: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub location: String,

    /// Rich-text HTML from the editor.
    #[validate(custom(function = "validate_not_blank"), length(max = 50000))]
    pub description: String,

    #[serde(default)]
    pub salary_min: Option<u64>,

    #[serde(default)]
    pub salary_max: Option<u64>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub experience_level: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub job_type: Option<String>,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub company_website: Option<String>,
}

impl JobDraft {
    pub fn salary(&self) -> SalaryRange {
        SalaryRange::new(self.salary_min, self.salary_max)
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("is required".into());
        return Err(err);
    }
    Ok(())
}

fn validate_salary_range(draft: &JobDraft) -> Result<(), ValidationError> {
    if draft.salary().is_inverted() {
        let mut err = ValidationError::new("salary_range");
        err.message = Some("Minimum salary cannot exceed maximum salary".into());
        return Err(err);
    }
    Ok(())
}

/// Render validation errors as one user-facing message.
///
/// Missing required fields are grouped into a single sentence; every other
/// failure is listed as `field: message`. Output order is stable.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut missing = Vec::new();
    let mut other = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        for err in field_errors.iter() {
            if err.code == "required" {
                missing.push(field.clone());
            } else {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code));
                if field == "__all__" {
                    other.push(msg);
                } else {
                    other.push(format!("{}: {}", field, msg));
                }
            }
        }
    }

    missing.sort();
    missing.dedup();
    other.sort();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        ));
    }
    parts.extend(other);
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> JobDraft {
        JobDraft {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            description: "<p>Build things</p>".to_string(),
            salary_min: Some(50_000),
            salary_max: Some(90_000),
            experience_level: Some("Mid".to_string()),
            job_type: Some("Full-time".to_string()),
            company_website: None,
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_blank_required_fields_are_reported_together() {
        let mut d = draft();
        d.title = "   ".to_string();
        d.location = String::new();

        let errors = d.validate().unwrap_err();
        let msg = describe_validation_errors(&errors);
        assert_eq!(msg, "Please fill in all required fields: location, title");
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let mut d = draft();
        d.description = "\n\t".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let mut d = draft();
        d.salary_min = None;
        d.salary_max = None;
        d.experience_level = None;
        d.job_type = None;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_inverted_salary_range_is_rejected() {
        let mut d = draft();
        d.salary_min = Some(100);
        d.salary_max = Some(10);
        let errors = d.validate().unwrap_err();
        let msg = describe_validation_errors(&errors);
        assert!(msg.contains("Minimum salary cannot exceed maximum salary"));
    }

    #[test]
    fn test_job_type_parsing() {
        assert_eq!(JobType::parse("Full-time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("part time"), Some(JobType::PartTime));
        assert_eq!(JobType::parse("REMOTE"), Some(JobType::Remote));
        assert_eq!(
            JobType::parse("Internship"),
            Some(JobType::Other("Internship".to_string()))
        );
        assert_eq!(JobType::parse("  "), None);
    }

    #[test]
    fn test_job_type_serializes_as_text() {
        let json = serde_json::to_string(&JobType::PartTime).unwrap();
        assert_eq!(json, "\"Part-time\"");
        let parsed: JobType = serde_json::from_str("\"Contract\"").unwrap();
        assert_eq!(parsed, JobType::Contract);
    }

    #[test]
    fn test_salary_display() {
        assert_eq!(SalaryRange::new(Some(10), Some(20)).display(), "₹10 - ₹20");
        assert_eq!(SalaryRange::new(Some(10), None).display(), "N/A");
        assert_eq!(SalaryRange::default().display(), "N/A");
    }

    #[test]
    fn test_from_draft_trims_and_drops_blank_optionals() {
        let mut d = draft();
        d.title = "  Backend Engineer ".to_string();
        d.company_website = Some("   ".to_string());
        let job = Job::from_draft(JobId::from("J1"), d, "admin-1");
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.company_website, None);
        assert_eq!(job.job_type, Some(JobType::FullTime));
        assert_eq!(job.created_by, "admin-1");
        assert!(job.created_at.is_none());
    }

    #[test]
    fn test_listing_view_empty_state() {
        let view = ListingView::from_jobs(&[]);
        assert!(view.jobs.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_LISTING_MESSAGE));
    }
}
