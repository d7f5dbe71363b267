//! Applicant dashboard handler.

use axum::extract::State;
use axum::Json;

use jobboard_models::DashboardView;

use crate::auth::CurrentSession;
use crate::error::ApiResult;
use crate::state::AppState;

/// The caller's applications with their jobs.
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<DashboardView>> {
    let user = session.require_user()?;
    Ok(Json(state.dashboard.load_view(&user.uid).await))
}
