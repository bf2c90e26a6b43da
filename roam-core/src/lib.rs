pub mod dates;
pub mod models;
pub mod requests;
pub mod search;
pub mod repository;

pub use models::{
    Airline, Airport, Continent, Country, Flight, Layover, Location, Passenger, PopularDestination,
    Trip, User,
};
pub use roam_catalog::{FlightSeats, SeatId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Duplicate entry: {0}")]
    Duplicate(String),
    #[error("Concurrent modification: {0}")]
    Conflict(String),
    #[error(transparent)]
    Seat(#[from] roam_catalog::SeatError),
    #[error("Storage failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Fresh GUID for records created without one.
pub fn new_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}
