//! User profiles.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Username used when a profile has none.
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Email snapshot used when neither the profile nor the identity has one.
pub const DEFAULT_EMAIL: &str = "No Email";

/// Role stored on a user profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Anything other than exactly `admin` is a regular user.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw contents of `users/{uid}`; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

/// A resolved user profile with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub username: String,
    pub role: Role,
}

impl UserProfile {
    /// Apply profile defaults.
    ///
    /// `record` is `None` when no profile document exists. The email falls
    /// back to the identity's email when the profile does not carry one.
    pub fn resolve(
        uid: impl Into<String>,
        identity_email: Option<&str>,
        record: Option<ProfileRecord>,
    ) -> Self {
        let record = record.unwrap_or_default();
        let username = record
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let email = record
            .email
            .filter(|e| !e.trim().is_empty())
            .or_else(|| identity_email.map(str::to_string));

        Self {
            uid: uid.into(),
            email,
            username,
            role: Role::from_stored(record.role.as_deref()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Email to snapshot onto an application.
    pub fn email_or_default(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_EMAIL)
    }
}

/// Signup form for creating a profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_resolves_to_defaults() {
        let profile = UserProfile::resolve("u1", Some("a@b.c"), None);
        assert_eq!(profile.username, "Anonymous");
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_profile_fields_take_precedence() {
        let record = ProfileRecord {
            email: Some("stored@b.c".to_string()),
            username: Some("ann".to_string()),
            role: Some("admin".to_string()),
        };
        let profile = UserProfile::resolve("u1", Some("token@b.c"), Some(record));
        assert_eq!(profile.username, "ann");
        assert!(profile.is_admin());
        assert_eq!(profile.email.as_deref(), Some("stored@b.c"));
    }

    #[test]
    fn test_unknown_role_is_user() {
        assert_eq!(Role::from_stored(Some("Admin ")), Role::User);
        assert_eq!(Role::from_stored(Some("superuser")), Role::User);
        assert_eq!(Role::from_stored(None), Role::User);
    }

    #[test]
    fn test_email_default_when_unknown() {
        let profile = UserProfile::resolve("u1", None, None);
        assert_eq!(profile.email_or_default(), "No Email");
    }
}
