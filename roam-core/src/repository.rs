use async_trait::async_trait;
use roam_catalog::{BookOutcome, DoubleBooking, FlightSeats, SeatId};

use crate::models::{Airline, Airport, Flight, Passenger, PopularDestination, Trip, User};
use crate::RepoResult;

/// Repository trait for airline data access
#[async_trait]
pub trait AirlineRepository: Send + Sync {
    async fn add(&self, airline: &Airline) -> RepoResult<()>;

    async fn get_all(&self) -> RepoResult<Vec<Airline>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Airline>>;

    async fn find_by_icao_code(&self, icao_code: &str) -> RepoResult<Option<Airline>>;

    /// Returns `false` when nothing matched.
    async fn delete(&self, guid: &str) -> RepoResult<bool>;
}

/// Repository trait for airport data access.
///
/// `add` find-or-creates the referenced country, continent and location.
#[async_trait]
pub trait AirportRepository: Send + Sync {
    async fn add(&self, airport: &Airport) -> RepoResult<()>;

    async fn get_all(&self) -> RepoResult<Vec<Airport>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Airport>>;

    async fn find_by_iata_code(&self, iata_code: &str) -> RepoResult<Option<Airport>>;

    async fn find_by_country_code(&self, country_code: &str) -> RepoResult<Vec<Airport>>;

    async fn delete(&self, guid: &str) -> RepoResult<bool>;
}

/// Repository trait for flights and their seat configurations.
///
/// `add` find-or-creates the airline, both airports and the layover, and
/// generates a seat configuration for the new flight.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn add(&self, flight: &Flight) -> RepoResult<()>;

    async fn get_all(&self) -> RepoResult<Vec<Flight>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Flight>>;

    async fn find_by_destination(&self, airport_guid: &str) -> RepoResult<Vec<Flight>>;

    async fn find_by_departure(&self, airport_guid: &str) -> RepoResult<Vec<Flight>>;

    async fn find_by_airline(&self, airline_guid: &str) -> RepoResult<Vec<Flight>>;

    async fn search(&self, departure_airport: &str, arrival_airport: &str) -> RepoResult<Vec<Flight>>;

    async fn delete(&self, guid: &str) -> RepoResult<bool>;

    async fn seats_for_flight(&self, flight_guid: &str) -> RepoResult<Option<FlightSeats>>;

    async fn seats_by_guid(&self, seats_guid: &str) -> RepoResult<Option<FlightSeats>>;
}

/// Result of booking one passenger seat during trip creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub flight_id: String,
    pub passenger_id: String,
    pub seat_id: SeatId,
    pub outcome: BookOutcome,
}

/// Repository trait for trips and the passengers booked on them
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Upserts the trip's flights, books every passenger seat and stores the
    /// trip in a single transaction. Nothing is written if any seat fails.
    async fn create(&self, trip: &Trip, policy: DoubleBooking) -> RepoResult<Vec<SeatAssignment>>;

    async fn get_all(&self) -> RepoResult<Vec<Trip>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Trip>>;

    async fn find_by_round_trip(&self, is_round_trip: bool) -> RepoResult<Vec<Trip>>;

    async fn find_by_departing_flight(&self, flight_guid: &str) -> RepoResult<Vec<Trip>>;

    async fn find_by_returning_flight(&self, flight_guid: &str) -> RepoResult<Vec<Trip>>;

    /// Deletes the trip and releases every seat its passengers held.
    async fn delete(&self, guid: &str) -> RepoResult<bool>;

    /// Removes the passenger at `index` (ticket order) and releases their seats.
    async fn remove_passenger(&self, trip_guid: &str, index: usize) -> RepoResult<Option<Passenger>>;

    async fn all_passengers(&self) -> RepoResult<Vec<Passenger>>;

    async fn passengers_by_trip(&self, trip_guid: &str) -> RepoResult<Vec<Passenger>>;

    /// Passengers on either leg of any trip using the flight.
    async fn passengers_by_flight(&self, flight_guid: &str) -> RepoResult<Vec<Passenger>>;
}

/// Stored account together with its password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn add(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn get_all(&self) -> RepoResult<Vec<User>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<User>>;

    async fn find_credentials(&self, email: &str) -> RepoResult<Option<UserCredentials>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Overwrites profile fields, and the password hash when one is given.
    async fn update(&self, user: &User, password_hash: Option<&str>) -> RepoResult<bool>;

    async fn delete(&self, guid: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait DestinationRepository: Send + Sync {
    async fn add(&self, destination: &PopularDestination) -> RepoResult<()>;

    async fn get_all(&self) -> RepoResult<Vec<PopularDestination>>;

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<PopularDestination>>;
}
