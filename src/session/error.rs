use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid session record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The user resolved, but fails the access policy.
    #[error("Don't have required permissions")]
    Unauthorized,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("{0} must not be empty")]
    EmptyToken(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
