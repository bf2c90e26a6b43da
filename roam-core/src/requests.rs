//! Inbound payloads that differ from the stored records: optional GUIDs,
//! lenient dates, plaintext passwords.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::Flight;
use crate::{dates, new_guid, SeatId};

#[derive(Debug, Clone, Deserialize)]
pub struct PassengerRequest {
    #[serde(default = "new_guid")]
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    pub departing_seat_id: SeatId,
    #[serde(default)]
    pub returning_seat_id: Option<SeatId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    #[serde(default = "new_guid")]
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub is_round_trip: bool,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub departing_flight: Option<Flight>,
    #[serde(default)]
    pub returning_flight: Option<Flight>,
    #[serde(default)]
    pub passengers: Vec<PassengerRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    #[serde(default = "new_guid")]
    pub guid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub guid: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_request_defaults() {
        let req: TripRequest = serde_json::from_value(serde_json::json!({
            "name": "Getaway",
            "departure_date": "2024-06-01T00:00:00.000Z",
            "return_date": null,
            "passengers": [{"name": "Ada", "departing_seat_id": 12}]
        }))
        .unwrap();

        assert_eq!(req.guid.len(), 36);
        assert!(!req.is_round_trip);
        assert_eq!(req.departure_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(req.return_date, None);
        assert!(req.departing_flight.is_none());
        assert_eq!(req.passengers[0].returning_seat_id, None);
        assert_ne!(req.passengers[0].guid, req.guid);
    }

    #[test]
    fn test_trip_request_rejects_bad_date() {
        let result: Result<TripRequest, _> = serde_json::from_value(serde_json::json!({
            "name": "Getaway",
            "departure_date": "next tuesday"
        }));
        assert!(result.is_err());
    }
}
