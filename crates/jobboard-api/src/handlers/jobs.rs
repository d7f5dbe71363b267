//! Job listing, detail and posting handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use jobboard_models::{Job, JobDraft, JobId, ListingView};

use crate::auth::CurrentSession;
use crate::error::{ApiError, ApiResult};
use crate::security::is_valid_document_id;
use crate::services::JobDetail;
use crate::state::AppState;

/// Where the client goes after a successful post.
const LISTING_ROUTE: &str = "/";

/// Parse a job id path segment.
pub(crate) fn job_id_param(raw: String) -> ApiResult<JobId> {
    if !is_valid_document_id(&raw) {
        return Err(ApiError::bad_request("Invalid job ID"));
    }
    Ok(JobId::from_string(raw))
}

/// List all jobs.
pub async fn list_jobs(State(state): State<AppState>) -> Json<ListingView> {
    Json(state.listing.load_view().await)
}

/// Get one job.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobDetail>> {
    let job_id = job_id_param(job_id)?;
    Ok(Json(state.listing.job_detail(&job_id).await?))
}

#[derive(Serialize)]
pub struct JobPostedResponse {
    pub message: String,
    pub job: Job,
    pub redirect_to: String,
}

/// Post a job (admins only).
pub async fn create_job(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(draft): Json<JobDraft>,
) -> ApiResult<(StatusCode, Json<JobPostedResponse>)> {
    let admin = session.require_admin()?;
    let job = state.posting.post(admin, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobPostedResponse {
            message: "Job posted successfully!".to_string(),
            job,
            redirect_to: LISTING_ROUTE.to_string(),
        }),
    ))
}
