//! Session resolution and profile signup.

use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use jobboard_models::{NewProfile, ProfileRecord, Role, SessionState, UserProfile};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::store::ProfileStore;

/// Turns a verified identity into a session.
#[derive(Clone)]
pub struct SessionResolver {
    profiles: Arc<dyn ProfileStore>,
}

impl SessionResolver {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Session for a request's identity, if any.
    pub async fn session(&self, identity: Option<&AuthUser>) -> SessionState {
        match identity {
            Some(user) => self.resolve(user).await,
            None => SessionState::Unauthenticated,
        }
    }

    /// Read `users/{uid}` and apply profile defaults.
    ///
    /// A failed read is logged and treated as a missing profile, so the
    /// caller is signed in with the `user` role.
    pub async fn resolve(&self, user: &AuthUser) -> SessionState {
        let record = match self.profiles.get(&user.uid).await {
            Ok(record) => record,
            Err(e) => {
                warn!(uid = %user.uid, "Failed to load profile, using defaults: {}", e);
                None
            }
        };

        SessionState::authenticated(UserProfile::resolve(
            &user.uid,
            user.email.as_deref(),
            record,
        ))
    }

    /// Create the caller's profile. The role is always `user`.
    pub async fn create_profile(&self, user: &AuthUser, form: NewProfile) -> ApiResult<UserProfile> {
        let form = NewProfile {
            username: form.username.trim().to_string(),
        };
        form.validate()?;

        match self
            .profiles
            .create(&user.uid, user.email.clone(), &form.username, Role::User)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_already_exists() => {
                return Err(ApiError::conflict("Profile already exists."));
            }
            Err(e) => {
                error!(uid = %user.uid, "Failed to create profile: {}", e);
                return Err(ApiError::internal("Failed to create profile."));
            }
        }

        info!(uid = %user.uid, "Created profile");

        Ok(UserProfile::resolve(
            &user.uid,
            user.email.as_deref(),
            Some(ProfileRecord {
                email: user.email.clone(),
                username: Some(form.username),
                role: Some(Role::User.as_str().to_string()),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::MockProfileStore;
    use jobboard_firestore::FirestoreError;
    use jobboard_models::AccessDenied;

    fn identity() -> AuthUser {
        AuthUser {
            uid: "U1".to_string(),
            email: Some("ana@example.com".to_string()),
            email_verified: true,
        }
    }

    #[tokio::test]
    async fn test_admin_profile_resolves_to_admin() {
        let mut store = MockProfileStore::new();
        store.expect_get().returning(|_| {
            Ok(Some(ProfileRecord {
                email: None,
                username: Some("ana".to_string()),
                role: Some("admin".to_string()),
            }))
        });

        let session = SessionResolver::new(Arc::new(store)).resolve(&identity()).await;
        let profile = session.require_admin().unwrap();
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn test_profile_read_failure_falls_back_to_user_role() {
        let mut store = MockProfileStore::new();
        store
            .expect_get()
            .returning(|_| Err(FirestoreError::ServerError(503, "unavailable".to_string())));

        let session = SessionResolver::new(Arc::new(store)).resolve(&identity()).await;
        assert_eq!(session.require_admin(), Err(AccessDenied::NotAdmin));
        assert_eq!(session.profile().unwrap().username, "Anonymous");
    }

    #[tokio::test]
    async fn test_existing_profile_conflicts() {
        let mut store = MockProfileStore::new();
        store
            .expect_create()
            .returning(|_, _, _, _| Err(FirestoreError::AlreadyExists("users/U1".to_string())));

        let err = SessionResolver::new(Arc::new(store))
            .create_profile(&identity(), NewProfile { username: "ana".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_profile_always_uses_user_role() {
        let mut store = MockProfileStore::new();
        store
            .expect_create()
            .withf(|uid, _, username, role| uid == "U1" && username == "ana" && *role == Role::User)
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let profile = SessionResolver::new(Arc::new(store))
            .create_profile(&identity(), NewProfile { username: "  ana ".to_string() })
            .await
            .unwrap();
        assert!(!profile.is_admin());
    }

    #[tokio::test]
    async fn test_blank_username_is_rejected_without_write() {
        let store = MockProfileStore::new();
        let err = SessionResolver::new(Arc::new(store))
            .create_profile(&identity(), NewProfile { username: "   ".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_session_without_identity_skips_profile_read() {
        let store = MockProfileStore::new();
        let resolver = SessionResolver::new(Arc::new(store));
        assert_eq!(resolver.session(None).await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_session_with_identity_reads_profile() {
        let mut store = MockProfileStore::new();
        store
            .expect_get()
            .withf(|uid| uid == "U1")
            .times(1)
            .returning(|_| Ok(None));

        let state = SessionResolver::new(Arc::new(store))
            .session(Some(&identity()))
            .await;
        assert_eq!(state.profile().unwrap().uid, "U1");
        assert_eq!(state.profile().unwrap().username, "Anonymous");
    }
}
