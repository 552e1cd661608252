use thiserror::Error;

/// Error cases surfaced by engine operations.
///
/// Variants carry user-facing messages; callers decide how to present
/// them (HTTP status codes, CLI output).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input failed a validation rule.
    #[error("{0}")]
    Validation(String),
    /// Credentials were missing or wrong.
    #[error("{0}")]
    Unauthorized(String),
    /// The acting user lacks the required role or ownership.
    #[error("{0}")]
    Forbidden(String),
    /// A referenced key does not exist.
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    /// A unique key is already taken.
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    /// The record is still referenced and cannot change.
    #[error("{0}")]
    Conflict(String),
    /// An internal step failed (hashing and the like).
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b))
            | (Self::Unauthorized(a), Self::Unauthorized(b))
            | (Self::Forbidden(a), Self::Forbidden(b))
            | (Self::KeyNotFound(a), Self::KeyNotFound(b))
            | (Self::ExistingKey(a), Self::ExistingKey(b))
            | (Self::Conflict(a), Self::Conflict(b))
            | (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
