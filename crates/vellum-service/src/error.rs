use thiserror::Error;
use vellum_db::error::DbError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AuthorizationDenied(String),

    #[error("Container {id} is its own descendant")]
    StructuralCycle { id: uuid::Uuid },

    #[error("Streaming failed: {0}")]
    StreamingFailure(#[source] std::io::Error),

    #[error("Browse failed: {0}")]
    BrowseFailure(String),

    #[error("Collaborator timed out: {0}")]
    CollaboratorTimeout(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Casbin error: {0}")]
    CasbinError(#[from] casbin::Error),

    #[error(transparent)]
    CoreError(#[from] vellum_core::error::CoreError),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CoreError(core) => Self::CoreError(core),
            err if err.is_timeout() => Self::CollaboratorTimeout(err.to_string()),
            err => Self::CollaboratorUnavailable(err.to_string()),
        }
    }
}

impl ServiceError {
    /// ## Summary
    /// Classifies an I/O error raised while opening stored content.
    ///
    /// A missing file is not-found; anything else is the storage layer failing.
    #[must_use]
    pub fn from_storage_io(err: &std::io::Error, what: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(what.to_string()),
            std::io::ErrorKind::TimedOut => Self::CollaboratorTimeout(format!("{what}: {err}")),
            _ => Self::CollaboratorUnavailable(format!("{what}: {err}")),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
