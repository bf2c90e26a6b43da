use roam_catalog::SeatError;
use roam_core::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Seat configuration encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Seat(#[from] SeatError),

    #[error("{0}")]
    Conflict(String),

    /// A row referenced by another row is gone.
    #[error("{0} not found")]
    Missing(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                RepositoryError::Duplicate(db.message().to_string())
            }
            StoreError::Seat(e) => RepositoryError::Seat(e),
            StoreError::Conflict(msg) => RepositoryError::Conflict(msg),
            StoreError::Missing(what) => RepositoryError::NotFound(what),
            other => RepositoryError::Backend(Box::new(other)),
        }
    }
}

/// `map_err` adapter for sqlx calls made directly from repository methods.
pub(crate) fn db_err(err: sqlx::Error) -> RepositoryError {
    StoreError::from(err).into()
}
