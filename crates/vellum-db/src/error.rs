use diesel_async::pooled_connection::bb8::RunError;
use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] RunError),

    #[error(transparent)]
    CoreError(#[from] vellum_core::error::CoreError),
}

impl DbError {
    /// Returns `true` if the store gave up waiting rather than failing outright.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::PoolError(RunError::TimedOut))
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
