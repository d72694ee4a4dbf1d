use thiserror::Error;

/// Why a connection was refused admission to a document room.
#[derive(Debug, Error)]
pub enum GateError {
    /// The supplied credential failed validation: bad signature, expired, or
    /// missing claims.
    #[error("invalid credential: {0}")]
    PolicyViolation(String),

    /// The requested document does not exist or was deleted.
    #[error("document not found")]
    NotFound,

    /// The credential is valid but the user is neither owner nor collaborator.
    #[error("no permission on this document")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable storage failure.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}
