//! Application submission handler.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use jobboard_models::Application;
use jobboard_storage::ResumeUpload;

use crate::auth::CurrentSession;
use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::job_id_param;
use crate::services::applications::APPLICATION_SUBMITTED_MESSAGE;
use crate::state::AppState;

/// Multipart field carrying the résumé.
const RESUME_FIELD: &str = "resume";

#[derive(Serialize)]
pub struct ApplicationSubmittedResponse {
    pub message: String,
    pub application: Application,
}

/// Apply to a job. The form may carry a `resume` file.
pub async fn apply_to_job(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(job_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApplicationSubmittedResponse>)> {
    let applicant = session.require_user()?;
    let job_id = job_id_param(job_id)?;
    let resume = read_resume(multipart).await?;

    let application = state.submissions.submit(applicant, &job_id, resume).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationSubmittedResponse {
            message: APPLICATION_SUBMITTED_MESSAGE.to_string(),
            application,
        }),
    ))
}

/// Pull the résumé part out of the form. An empty file input counts as none.
async fn read_resume(mut multipart: Multipart) -> ApiResult<Option<ResumeUpload>> {
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form data: {}", e)))?
    {
        if field.name() != Some(RESUME_FIELD) {
            debug!(field = ?field.name(), "Ignoring form field");
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read résumé: {}", e)))?;

        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }

        resume = Some(ResumeUpload::new(file_name, content_type, bytes.to_vec()));
    }

    Ok(resume)
}
