//! Session and profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use jobboard_models::{NewProfile, SessionState, UserProfile};

use crate::auth::{AuthUser, CurrentSession};
use crate::error::ApiResult;
use crate::state::AppState;

/// The caller's session state. Anonymous callers get `unauthenticated`.
pub async fn get_session(CurrentSession(session): CurrentSession) -> Json<SessionState> {
    Json(session)
}

/// Create the caller's profile at signup.
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<NewProfile>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.sessions.create_profile(&user, form).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}
