use serde::Deserialize;

/// Body of `POST /api/flights/search`.
///
/// Older clients spell the arrival field `arival_airport_id`; both are accepted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FlightSearchRequest {
    pub departure_airport_id: String,
    #[serde(alias = "arival_airport_id")]
    pub arrival_airport_id: String,
}
