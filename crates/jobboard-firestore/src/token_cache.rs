//! Access tokens for the Firestore REST API.
//!
//! Production uses a service account through `gcp_auth`, cached until shortly
//! before expiry. The emulator accepts a fixed `owner` token.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{FirestoreError, FirestoreResult};

/// Refresh this long before the provider-reported expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// TTL assumed when the provider reports none usable.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for Firestore access.
pub const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Token accepted by the Firestore emulator.
pub const EMULATOR_TOKEN: &str = "owner";

pub struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    fn is_unexpired(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Where bearer tokens come from.
pub enum TokenSource {
    /// Fixed token (emulator).
    Static(String),
    /// Service account tokens, cached.
    Provider {
        auth: Arc<dyn TokenProvider>,
        cache: RwLock<Option<CachedToken>>,
    },
}

impl TokenSource {
    pub fn emulator() -> Self {
        Self::Static(EMULATOR_TOKEN.to_string())
    }

    pub fn provider(auth: Arc<dyn TokenProvider>) -> Self {
        Self::Provider {
            auth,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        if let Self::Provider { cache, .. } = self {
            *cache.write().await = None;
        }
    }

    /// A bearer token valid for at least the refresh margin.
    pub async fn get_token(&self) -> FirestoreResult<String> {
        let (auth, cache) = match self {
            Self::Static(token) => return Ok(token.clone()),
            Self::Provider { auth, cache } => (auth, cache),
        };

        if let Some(cached) = cache.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let mut slot = cache.write().await;
        // another task may have refreshed while we waited for the lock
        if let Some(cached) = slot.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        match auth.token(&[FIRESTORE_SCOPE]).await {
            Ok(token) => {
                let access_token = token.as_str().to_string();
                let now = Utc::now();
                let expires = token.expires_at();
                let expires_at = if expires > now {
                    Instant::now() + (expires - now).to_std().unwrap_or(TOKEN_DEFAULT_TTL)
                } else {
                    Instant::now()
                };

                *slot = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at,
                });
                debug!("Refreshed Firestore access token");
                Ok(access_token)
            }
            Err(e) => match slot.as_ref() {
                Some(cached) if cached.is_unexpired() => {
                    warn!("Token refresh failed, reusing current token: {}", e);
                    Ok(cached.access_token.clone())
                }
                _ => Err(FirestoreError::auth_error(format!(
                    "Failed to obtain auth token: {}",
                    e
                ))),
            },
        }
    }
}
