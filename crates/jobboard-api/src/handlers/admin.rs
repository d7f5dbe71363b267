//! Administrator console handlers.
//!
//! Every route here requires a profile with the `admin` role.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use jobboard_models::{Application, ApplicationId, ApplicationStatus, JobId, JobSummary};

use crate::auth::CurrentSession;
use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::job_id_param;
use crate::security::is_valid_application_id;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AdminJobsResponse {
    pub jobs: Vec<JobSummary>,
}

#[derive(Serialize)]
pub struct JobApplicationsResponse {
    pub job_id: JobId,
    pub applications: Vec<Application>,
}

#[derive(Serialize)]
pub struct DeleteJobResponse {
    pub success: bool,
    pub job_id: JobId,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    /// The patched record, when loaded in this console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

/// List all jobs for the console.
pub async fn admin_list_jobs(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<AdminJobsResponse>> {
    let admin = session.require_admin()?;
    let jobs = state.admin.load_jobs(admin).await;

    Ok(Json(AdminJobsResponse {
        jobs: jobs.iter().map(JobSummary::from).collect(),
    }))
}

/// Applications received for a job.
pub async fn admin_job_applications(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobApplicationsResponse>> {
    let admin = session.require_admin()?;
    let job_id = job_id_param(job_id)?;
    let applications = state.admin.applications_for(admin, &job_id).await;

    Ok(Json(JobApplicationsResponse {
        job_id,
        applications,
    }))
}

/// Delete a job. Its applications are kept.
pub async fn admin_delete_job(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(job_id): Path<String>,
) -> ApiResult<Json<DeleteJobResponse>> {
    let admin = session.require_admin()?;
    let job_id = job_id_param(job_id)?;
    let remaining = state.admin.delete_job(admin, &job_id).await?;

    Ok(Json(DeleteJobResponse {
        success: true,
        job_id,
        jobs: remaining.iter().map(JobSummary::from).collect(),
    }))
}

/// Set an application's review status.
pub async fn admin_update_application_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    let admin = session.require_admin()?;

    if !is_valid_application_id(&application_id) {
        return Err(ApiError::bad_request("Invalid application ID"));
    }
    let application_id = ApplicationId::from_string(application_id);

    let status: ApplicationStatus = request.status.parse().map_err(ApiError::BadRequest)?;

    let application = state
        .admin
        .update_status(admin, &application_id, status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        application_id,
        status,
        application,
    }))
}
