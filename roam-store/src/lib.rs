pub mod app_config;
pub mod database;
pub mod error;

mod cascade;
mod hydrate;
mod inventory;

pub mod airline_repo;
pub mod airport_repo;
pub mod destination_repo;
pub mod flight_repo;
pub mod trip_repo;
pub mod user_repo;

#[cfg(test)]
mod fixtures;

pub use airline_repo::StoreAirlineRepository;
pub use airport_repo::StoreAirportRepository;
pub use app_config::Config;
pub use database::DbClient;
pub use destination_repo::StoreDestinationRepository;
pub use error::StoreError;
pub use flight_repo::StoreFlightRepository;
pub use trip_repo::StoreTripRepository;
pub use user_repo::StoreUserRepository;
