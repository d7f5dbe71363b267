//! Firestore REST API client.
//!
//! This crate provides:
//! - Typed repositories for jobs, applications and user profiles
//! - Structured queries and atomic commits with server timestamps
//! - Service account authentication via gcp_auth, or the local emulator

pub mod application_repo;
pub mod client;
pub mod error;
pub mod job_repo;
pub mod metrics;
pub mod token_cache;
pub mod types;
pub mod user_repo;


pub use application_repo::ApplicationRepository;
pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use job_repo::JobRepository;
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
pub use user_repo::UserRepository;
