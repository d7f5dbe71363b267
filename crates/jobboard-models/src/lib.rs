//! Shared data models for the job board.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and the job submission form
//! - Applications and their review status
//! - User profiles and session state
//! - Screen view models (listing, applicant dashboard, admin console)

pub mod application;
pub mod console;
pub mod dashboard;
pub mod ids;
pub mod job;
pub mod session;
pub mod user;

// Re-export common types
pub use application::{Application, ApplicationStatus, NewApplication};
pub use console::{without_job, ApplicationCache};
pub use dashboard::{join_applied_jobs, AppliedJob, DashboardView, JobDisplay};
pub use ids::{ApplicationId, JobId};
pub use job::{describe_validation_errors, Job, JobDraft, JobSummary, JobType, ListingView, SalaryRange};
pub use session::{AccessDenied, SessionState};
pub use user::{NewProfile, ProfileRecord, Role, UserProfile};
