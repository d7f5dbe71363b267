//! Repository for `users/{uid}` profiles.

use std::collections::HashMap;

use tracing::info;

use jobboard_models::{ProfileRecord, Role};

use crate::client::FirestoreClient;
use crate::error::FirestoreResult;
use crate::types::{Document, ToFirestoreValue};

pub const USERS_COLLECTION: &str = "users";

/// Repository for user profiles.
#[derive(Clone)]
pub struct UserRepository {
    client: FirestoreClient,
}

impl UserRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Raw profile fields, or `None` when no profile exists.
    pub async fn get(&self, uid: &str) -> FirestoreResult<Option<ProfileRecord>> {
        let doc = self.client.get_document(USERS_COLLECTION, uid).await?;
        Ok(doc.as_ref().map(document_to_profile))
    }

    /// Create a profile. Fails with `AlreadyExists` if one is there.
    pub async fn create(
        &self,
        uid: &str,
        email: Option<&str>,
        username: &str,
        role: Role,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("username".to_string(), username.to_firestore_value());
        fields.insert("role".to_string(), role.as_str().to_firestore_value());
        if let Some(email) = email {
            fields.insert("email".to_string(), email.to_firestore_value());
        }

        self.client
            .create_document(USERS_COLLECTION, uid, fields, &["createdAt"])
            .await?;

        info!("Created profile for {}", uid);
        Ok(())
    }
}

fn document_to_profile(doc: &Document) -> ProfileRecord {
    ProfileRecord {
        email: doc.get("email"),
        username: doc.get("username"),
        role: doc.get("role"),
    }
}
