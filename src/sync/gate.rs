use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GateError;
use crate::store::SharedStore;

const ANONYMOUS_NAME: &str = "anonymous";

/// Claims carried by bearer tokens from the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Display name of the account.
    pub sub: String,

    /// Numeric user id.
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Identity resolved for an admitted connection.
#[derive(Debug, Clone)]
pub struct AuthorizedIdentity {
    pub user_id: Option<i64>,
    pub username: String,
}

/// Decides whether a connection may join a document room.
///
/// The gate reads the metadata and membership stores but mutates nothing;
/// rejection is its only side effect.
pub struct ConnectionGate {
    jwt_secret: Option<String>,
    store: SharedStore,
}

impl ConnectionGate {
    pub fn new(jwt_secret: Option<String>, store: SharedStore) -> Self {
        Self { jwt_secret, store }
    }

    /// Resolve the identity allowed to join `doc_id`, or the reason to reject.
    ///
    /// Connections without a token are admitted as anonymous with unchecked
    /// read/write access; a stricter anonymous policy belongs here, not in the
    /// message handlers.
    pub async fn authorize(
        &self,
        doc_id: &str,
        token: Option<&str>,
        name_override: Option<&str>,
    ) -> Result<AuthorizedIdentity, GateError> {
        let document = self
            .store
            .fetch_document(doc_id)
            .await?
            .filter(|doc| !doc.is_deleted())
            .ok_or(GateError::NotFound)?;

        let override_name = name_override.map(str::trim).filter(|name| !name.is_empty());

        let Some(token) = token else {
            return Ok(AuthorizedIdentity {
                user_id: None,
                username: override_name.unwrap_or(ANONYMOUS_NAME).to_string(),
            });
        };

        let claims = self.validate_token(token)?;

        if claims.user_id != document.owner_id {
            let collaborator = self.store.is_collaborator(doc_id, claims.user_id).await?;
            if !collaborator {
                warn!(
                    "User {} denied access to document {}",
                    claims.user_id, doc_id
                );
                return Err(GateError::Forbidden);
            }
        }

        info!(
            "User {} ({}) authorized on document {}",
            claims.sub, claims.user_id, doc_id
        );
        Ok(AuthorizedIdentity {
            user_id: Some(claims.user_id),
            // The client-supplied display name takes precedence over the
            // token subject
            username: override_name.unwrap_or(&claims.sub).to_string(),
        })
    }

    /// Validate a bearer token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, GateError> {
        let Some(secret) = &self.jwt_secret else {
            return Err(GateError::PolicyViolation(
                "no signing secret configured".to_string(),
            ));
        };
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| GateError::PolicyViolation(e.to_string()))?;
        Ok(data.claims)
    }
}
