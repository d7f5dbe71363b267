//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - Job listing, detail and admin-only posting
//! - Applications with optional résumé upload and the applicant dashboard
//! - The administrator console (per-job application cache, status review)
//! - Firebase ID token verification and explicit session state
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use auth::{AuthUser, IdTokenVerifier};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{ApplicationStore, JobStore, ProfileStore};
pub use state::AppState;
