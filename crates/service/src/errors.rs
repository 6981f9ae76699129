use thiserror::Error;

use crate::storage::StorageError;

/// Failures surfaced by the message service. The display string is the
/// human-readable message returned to callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    pub fn invalid_id() -> Self { Self::InvalidInput("Invalid ID format.".into()) }

    pub fn message_not_found(id: &str) -> Self { Self::NotFound(format!("Message with ID={id} not found")) }

    pub fn storage(action: &str, cause: StorageError) -> Self { Self::Storage(format!("Failed to {action}: {cause}")) }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self { Self::Validation(e.to_string()) }
}
