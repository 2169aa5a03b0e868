use serde::Serialize;
use thiserror::Error;

use crate::services::navigator::NavigatorError;
use crate::services::staging::StagingError;
use crate::services::transform::TransformError;

/// Failures reported by the image/filesystem collaborator calls.
///
/// Each variant maps to one boundary call so callers can apply the
/// per-call recovery policy (drop the file, keep the stale listing,
/// degrade to "available", ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Cannot read image metadata for {path}: {message}")]
    Metadata { path: String, message: String },
    #[error("Cannot access {path}: {message}")]
    Access { path: String, message: String },
    #[error("{0} has no parent directory")]
    ParentNavigation(String),
    #[error("Cannot check whether {path} exists: {message}")]
    ExistenceCheck { path: String, message: String },
    #[error("{0}")]
    Save(String),
    #[error("Failed to open {path}: {message}")]
    OpenFolder { path: String, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(error: tokio::task::JoinError) -> Self {
        BackendError::Internal(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Database error: {0}")]
    Database(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for CommandError {
    fn from(error: sqlx::Error) -> Self {
        CommandError::Database(error.to_string())
    }
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
