//! Error types for the Order actor.

use thiserror::Error;

use crate::framework::FrameworkError;

/// Errors that can occur during order operations.
///
/// A missing order is not an error; lookups and status changes return
/// `Ok(None)` instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order could not be written to (or read from) storage.
    /// Nothing was changed.
    #[error("Order storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A caller-supplied identifier is already taken.
    #[error("Duplicate order id: {0}")]
    DuplicateId(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::Storage(e) => OrderError::StorageUnavailable(e.to_string()),
            FrameworkError::DuplicateId(id) => OrderError::DuplicateId(id),
            FrameworkError::EntityError(e) => match e.downcast::<OrderError>() {
                Ok(inner) => *inner,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
