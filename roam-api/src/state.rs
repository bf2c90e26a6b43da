use std::sync::Arc;

use roam_booking::{AccountService, DestinationService, SeatService, TripService};
use roam_core::repository::{
    AirlineRepository, AirportRepository, DestinationRepository, FlightRepository, TripRepository,
    UserRepository,
};
use roam_store::app_config::BookingConfig;
use roam_store::{
    DbClient, StoreAirlineRepository, StoreAirportRepository, StoreDestinationRepository, StoreFlightRepository,
    StoreTripRepository, StoreUserRepository,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub airline_repo: Arc<dyn AirlineRepository>,
    pub airport_repo: Arc<dyn AirportRepository>,
    pub flight_repo: Arc<dyn FlightRepository>,
    pub trip_repo: Arc<dyn TripRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub destination_repo: Arc<dyn DestinationRepository>,
    pub trips: Arc<TripService>,
    pub accounts: Arc<AccountService>,
    pub seats: Arc<SeatService>,
    pub destinations: Arc<DestinationService>,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wires the SQLite repositories and the services built on them.
    pub fn new(db: &DbClient, auth: AuthConfig, booking: &BookingConfig) -> Self {
        let pool = &db.pool;
        let airline_repo: Arc<dyn AirlineRepository> = Arc::new(StoreAirlineRepository::new(pool.clone()));
        let airport_repo: Arc<dyn AirportRepository> = Arc::new(StoreAirportRepository::new(pool.clone()));
        let flight_repo: Arc<dyn FlightRepository> = Arc::new(StoreFlightRepository::new(pool.clone()));
        let trip_repo: Arc<dyn TripRepository> = Arc::new(StoreTripRepository::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(StoreUserRepository::new(pool.clone()));
        let destination_repo: Arc<dyn DestinationRepository> = Arc::new(StoreDestinationRepository::new(pool.clone()));

        Self {
            trips: Arc::new(TripService::new(trip_repo.clone(), booking.double_booking())),
            accounts: Arc::new(AccountService::new(user_repo.clone())),
            seats: Arc::new(SeatService::new(flight_repo.clone())),
            destinations: Arc::new(DestinationService::new(
                destination_repo.clone(),
                booking.popular_destination_limit,
            )),
            airline_repo,
            airport_repo,
            flight_repo,
            trip_repo,
            user_repo,
            destination_repo,
            auth,
        }
    }
}
