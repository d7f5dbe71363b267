//! Explicit session state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::UserProfile;

/// Where a caller's session stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No verified identity.
    #[default]
    Unauthenticated,
    /// Identity verified, profile not resolved yet.
    Loading,
    /// Identity verified and profile resolved.
    Authenticated { profile: UserProfile },
}

/// Reasons a session may not use a screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("You must be logged in.")]
    NotSignedIn,

    #[error("Access Denied: Admins Only")]
    NotAdmin,

    #[error("Session is still loading")]
    Pending,
}

impl SessionState {
    pub fn authenticated(profile: UserProfile) -> Self {
        SessionState::Authenticated { profile }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated { profile } => Some(profile),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// The signed-in profile, or why there is none.
    pub fn require_user(&self) -> Result<&UserProfile, AccessDenied> {
        match self {
            SessionState::Authenticated { profile } => Ok(profile),
            SessionState::Loading => Err(AccessDenied::Pending),
            SessionState::Unauthenticated => Err(AccessDenied::NotSignedIn),
        }
    }

    /// The signed-in profile if its role is `admin`.
    pub fn require_admin(&self) -> Result<&UserProfile, AccessDenied> {
        let profile = self.require_user()?;
        if profile.is_admin() {
            Ok(profile)
        } else {
            Err(AccessDenied::NotAdmin)
        }
    }
}
