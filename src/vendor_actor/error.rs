use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VendorError {
    #[error("Vendor not found: {0}")]
    NotFound(String),
    #[error("Vendor profile already exists for user: {0}")]
    AlreadyExists(String),
    #[error("Vendor validation error: {0}")]
    ValidationError(String),
    #[error("Not permitted: {0}")]
    Forbidden(String),
    #[error("User lookup failed: {0}")]
    UserLookup(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for VendorError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Conflict(key) => Self::AlreadyExists(key),
            FrameworkError::Rejected(msg) => Self::ValidationError(msg),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
