use roam_catalog::SeatError;
use roam_core::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => ServiceError::NotFound(what),
            RepositoryError::Duplicate(msg) => ServiceError::Duplicate(msg),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            // A seat id the flight doesn't have is bad input, not a server fault.
            RepositoryError::Seat(e @ SeatError::NotFound(_)) => ServiceError::Validation(e.to_string()),
            RepositoryError::Seat(e @ SeatError::AlreadyTaken(_)) => ServiceError::Conflict(e.to_string()),
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
