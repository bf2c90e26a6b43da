use std::sync::Arc;

use roam_catalog::FlightSeats;
use roam_core::repository::FlightRepository;

use crate::error::{ServiceError, ServiceResult};

/// Read access to seat configurations.
pub struct SeatService {
    flights: Arc<dyn FlightRepository>,
}

impl SeatService {
    pub fn new(flights: Arc<dyn FlightRepository>) -> Self {
        Self { flights }
    }

    pub async fn for_flight(&self, flight_guid: &str) -> ServiceResult<FlightSeats> {
        self.flights
            .seats_for_flight(flight_guid)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seat configuration for flight {flight_guid}")))
    }

    pub async fn by_guid(&self, seats_guid: &str) -> ServiceResult<FlightSeats> {
        self.flights
            .seats_by_guid(seats_guid)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seat configuration {seats_guid}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_catalog::TOTAL_SEATS;
    use roam_core::{Airline, Airport, Flight};
    use roam_store::{DbClient, StoreFlightRepository};

    fn airport(guid: &str) -> Airport {
        Airport {
            guid: guid.to_string(),
            full_name: guid.to_uppercase(),
            short_name: guid.to_string(),
            municipality_name: guid.to_string(),
            iata_code: None,
            location: None,
            country: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_both_ways() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = Arc::new(StoreFlightRepository::new(db.pool));
        repo.add(&Flight {
            guid: "fl-1".to_string(),
            flight_time_minutes: 60,
            departure_time: "12:00".to_string(),
            arrival_time: "13:00".to_string(),
            num_stops: None,
            price_economy: 10.0,
            price_business: None,
            baggage_allowance: "none".to_string(),
            airline: Airline {
                guid: "al".to_string(),
                icao_code: None,
                name: "Air".to_string(),
                logo_path: None,
            },
            departure_airport: airport("a"),
            arrival_airport: airport("b"),
            layover: None,
            seat_configuration_id: None,
        })
        .await
        .unwrap();

        let svc = SeatService::new(repo);
        let seats = svc.for_flight("fl-1").await.unwrap();
        assert_eq!(seats.seat_configuration.len(), TOTAL_SEATS as usize);
        assert_eq!(svc.by_guid(&seats.guid).await.unwrap(), seats);

        assert!(matches!(svc.for_flight("fl-404").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.by_guid("nope").await, Err(ServiceError::NotFound(_))));
    }
}
