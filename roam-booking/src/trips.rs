use std::sync::Arc;

use roam_catalog::{BookOutcome, DoubleBooking};
use roam_core::repository::TripRepository;
use roam_core::requests::{PassengerRequest, TripRequest};
use roam_core::{Passenger, Trip};
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Books trips: validates the request, then hands the whole itinerary to the
/// repository, which upserts flights and books seats in one transaction.
pub struct TripService {
    trips: Arc<dyn TripRepository>,
    policy: DoubleBooking,
}

impl TripService {
    pub fn new(trips: Arc<dyn TripRepository>, policy: DoubleBooking) -> Self {
        Self { trips, policy }
    }

    pub async fn book(&self, request: TripRequest) -> ServiceResult<Trip> {
        let trip = prepare(request)?;
        let assignments = self.trips.create(&trip, self.policy).await?;

        for taken in assignments.iter().filter(|a| a.outcome == BookOutcome::AlreadyBooked) {
            warn!(
                trip_id = %trip.guid,
                flight_id = %taken.flight_id,
                seat_id = taken.seat_id,
                passenger_id = %taken.passenger_id,
                "Seat was already booked"
            );
        }
        info!(trip_id = %trip.guid, seats = assignments.len(), "Trip created");

        // Re-read so the response carries the stored seat configuration ids.
        self.trips
            .get_by_guid(&trip.guid)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Trip {}", trip.guid)))
    }

    /// Deletes the trip and frees its seats.
    pub async fn cancel(&self, guid: &str) -> ServiceResult<()> {
        if !self.trips.delete(guid).await? {
            return Err(ServiceError::NotFound(format!("Trip {guid}")));
        }
        Ok(())
    }

    /// Drops the ticket at `index` (0-based, booking order) and frees its seats.
    pub async fn remove_ticket(&self, guid: &str, index: usize) -> ServiceResult<Passenger> {
        self.trips
            .remove_passenger(guid, index)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Ticket {index} of trip {guid}")))
    }
}

fn prepare(request: TripRequest) -> ServiceResult<Trip> {
    let departing_flight = request
        .departing_flight
        .ok_or_else(|| ServiceError::Validation("A trip needs a departing flight".to_string()))?;

    let returning_flight = if request.is_round_trip {
        Some(request.returning_flight.ok_or_else(|| {
            ServiceError::Validation("A round trip needs a returning flight".to_string())
        })?)
    } else {
        None
    };

    let passengers = request
        .passengers
        .into_iter()
        .map(|p| passenger(&request.guid, request.is_round_trip, p))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Trip {
        guid: request.guid,
        name: request.name,
        is_round_trip: request.is_round_trip,
        departure_date: request.departure_date,
        return_date: request.return_date,
        departing_flight,
        returning_flight,
        passengers,
    })
}

fn passenger(trip_guid: &str, round_trip: bool, p: PassengerRequest) -> ServiceResult<Passenger> {
    if p.departing_seat_id <= 0 {
        return Err(ServiceError::Validation(format!(
            "Invalid departing seat {} for passenger {}",
            p.departing_seat_id, p.name
        )));
    }

    let returning_seat_id = match (round_trip, p.returning_seat_id) {
        (false, _) => None,
        (true, Some(seat)) if seat > 0 => Some(seat),
        (true, Some(seat)) => {
            return Err(ServiceError::Validation(format!(
                "Invalid returning seat {seat} for passenger {}",
                p.name
            )))
        }
        (true, None) => {
            return Err(ServiceError::Validation(format!(
                "Passenger {} needs a returning seat on a round trip",
                p.name
            )))
        }
    };

    Ok(Passenger {
        guid: p.guid,
        trip_id: trip_guid.to_string(),
        name: p.name,
        age: p.age,
        departing_seat_id: p.departing_seat_id,
        returning_seat_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_core::repository::FlightRepository;
    use roam_core::{Airline, Airport, Flight};
    use roam_store::{DbClient, StoreFlightRepository, StoreTripRepository};
    use serde_json::json;

    fn airport(guid: &str, iata: &str) -> Airport {
        Airport {
            guid: guid.to_string(),
            full_name: format!("{iata} Airport"),
            short_name: iata.to_string(),
            municipality_name: iata.to_string(),
            iata_code: Some(iata.to_string()),
            location: None,
            country: None,
        }
    }

    fn flight(guid: &str, from: Airport, to: Airport) -> Flight {
        Flight {
            guid: guid.to_string(),
            flight_time_minutes: 120,
            departure_time: "07:00".to_string(),
            arrival_time: "09:00".to_string(),
            num_stops: None,
            price_economy: 99.0,
            price_business: None,
            baggage_allowance: "20kg".to_string(),
            airline: Airline {
                guid: "al-1".to_string(),
                icao_code: Some("RMA".to_string()),
                name: "Roam Air".to_string(),
                logo_path: None,
            },
            departure_airport: from,
            arrival_airport: to,
            layover: None,
            seat_configuration_id: None,
        }
    }

    fn outbound() -> Flight {
        flight("fl-out", airport("ap-a", "AAA"), airport("ap-b", "BBB"))
    }

    fn inbound() -> Flight {
        flight("fl-back", airport("ap-b", "BBB"), airport("ap-a", "AAA"))
    }

    fn request(value: serde_json::Value) -> TripRequest {
        serde_json::from_value(value).unwrap()
    }

    async fn service(policy: DoubleBooking) -> (TripService, StoreFlightRepository) {
        let db = DbClient::in_memory().await.unwrap();
        let trips = Arc::new(StoreTripRepository::new(db.pool.clone()));
        (TripService::new(trips, policy), StoreFlightRepository::new(db.pool))
    }

    #[tokio::test]
    async fn test_book_round_trip() {
        let (svc, flights) = service(DoubleBooking::Allow).await;

        let trip = svc
            .book(request(json!({
                "name": "Summer",
                "is_round_trip": true,
                "departure_date": "2024-07-01",
                "return_date": "2024-07-10T00:00:00Z",
                "departing_flight": outbound(),
                "returning_flight": inbound(),
                "passengers": [
                    {"name": "Ada", "age": 36, "departing_seat_id": 21, "returning_seat_id": 22},
                    {"name": "Bob", "departing_seat_id": 23, "returning_seat_id": 24}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(trip.passengers.len(), 2);
        assert!(trip.passengers.iter().all(|p| p.trip_id == trip.guid));
        assert!(trip.departing_flight.seat_configuration_id.is_some());
        assert_eq!(trip.return_date.unwrap().to_string(), "2024-07-10");

        let seats = flights.seats_for_flight("fl-back").await.unwrap().unwrap();
        assert!(!seats.seat(22).unwrap().available);
        assert!(!seats.seat(24).unwrap().available);
    }

    #[tokio::test]
    async fn test_validation_failures() {
        let (svc, _) = service(DoubleBooking::Allow).await;

        let no_flight = svc.book(request(json!({"name": "x"}))).await.unwrap_err();
        assert!(matches!(no_flight, ServiceError::Validation(_)));

        let no_return = svc
            .book(request(json!({
                "name": "x", "is_round_trip": true, "departing_flight": outbound()
            })))
            .await
            .unwrap_err();
        assert!(matches!(no_return, ServiceError::Validation(_)));

        let no_return_seat = svc
            .book(request(json!({
                "name": "x", "is_round_trip": true,
                "departing_flight": outbound(), "returning_flight": inbound(),
                "passengers": [{"name": "Ada", "departing_seat_id": 30}]
            })))
            .await
            .unwrap_err();
        assert!(matches!(no_return_seat, ServiceError::Validation(_)));

        let bad_seat = svc
            .book(request(json!({
                "name": "x", "departing_flight": outbound(),
                "passengers": [{"name": "Ada", "departing_seat_id": 0}]
            })))
            .await
            .unwrap_err();
        assert!(matches!(bad_seat, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_seat_is_validation_error() {
        let (svc, flights) = service(DoubleBooking::Allow).await;

        let err = svc
            .book(request(json!({
                "name": "x", "departing_flight": outbound(),
                "passengers": [{"name": "Ada", "departing_seat_id": 189}]
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref msg) if msg.contains("189")));
        assert!(flights.get_by_guid("fl-out").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_way_ignores_return_leg() {
        let (svc, flights) = service(DoubleBooking::Allow).await;

        let trip = svc
            .book(request(json!({
                "name": "x", "departing_flight": outbound(), "returning_flight": inbound(),
                "passengers": [{"name": "Ada", "departing_seat_id": 50, "returning_seat_id": 51}]
            })))
            .await
            .unwrap();

        assert!(trip.returning_flight.is_none());
        assert_eq!(trip.passengers[0].returning_seat_id, None);
        assert!(flights.get_by_guid("fl-back").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_strict_policy_reports_conflict() {
        let (svc, flights) = service(DoubleBooking::Reject).await;
        flights.add(&outbound()).await.unwrap();
        let seats = flights.seats_for_flight("fl-out").await.unwrap().unwrap();
        let taken = seats.seat_configuration.iter().find(|s| !s.available).unwrap().seat_id;

        let err = svc
            .book(request(json!({
                "name": "x", "departing_flight": outbound(),
                "passengers": [{"name": "Ada", "departing_seat_id": taken}]
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_cancel_and_remove_ticket() {
        let (svc, _) = service(DoubleBooking::Allow).await;
        let trip = svc
            .book(request(json!({
                "guid": "trip-1", "name": "x", "departing_flight": outbound(),
                "passengers": [
                    {"name": "Ada", "departing_seat_id": 60},
                    {"name": "Bob", "departing_seat_id": 61}
                ]
            })))
            .await
            .unwrap();
        assert_eq!(trip.guid, "trip-1");

        let removed = svc.remove_ticket("trip-1", 0).await.unwrap();
        assert_eq!(removed.name, "Ada");
        assert!(matches!(svc.remove_ticket("trip-1", 3).await, Err(ServiceError::NotFound(_))));

        svc.cancel("trip-1").await.unwrap();
        assert!(matches!(svc.cancel("trip-1").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_trip_guid() {
        let (svc, _) = service(DoubleBooking::Allow).await;
        let body = json!({"guid": "trip-1", "name": "x", "departing_flight": outbound()});

        svc.book(request(body.clone())).await.unwrap();
        let err = svc.book(request(body)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }
}
