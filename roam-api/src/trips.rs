use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use roam_core::requests::TripRequest;
use roam_core::{Passenger, Trip};
use serde_json::Value;

use crate::bulk::{created, message, OneOrMany};
use crate::error::{AppError, AppJson, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", get(list_trips).post(create_trips))
        .route("/api/trips/round_trip/{flag}", get(list_by_round_trip))
        .route("/api/trips/departing_flight/{guid}", get(list_by_departing_flight))
        .route("/api/trips/returning_flight/{guid}", get(list_by_returning_flight))
        .route("/api/trips/{guid}", get(get_trip).delete(delete_trip))
        .route("/api/trips/{guid}/{index}", delete(remove_ticket))
        // Passengers
        .route("/api/passengers", get(list_passengers))
        .route("/api/passengers/trip/{guid}", get(passengers_by_trip))
        .route("/api/passengers/flight/{guid}", get(passengers_by_flight))
}

/// Each trip is booked in its own transaction; a failure stops the batch.
async fn create_trips(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OneOrMany<TripRequest>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let requests = payload.into_vec();
    let count = requests.len();
    for request in requests {
        state.trips.book(request).await?;
    }
    Ok(created(count, "trip"))
}

async fn list_trips(State(state): State<AppState>) -> AppResult<Json<Vec<Trip>>> {
    Ok(Json(state.trip_repo.get_all().await?))
}

async fn get_trip(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Trip>> {
    state
        .trip_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))
}

async fn delete_trip(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Value>> {
    state.trips.cancel(&guid).await?;
    Ok(message("Trip deleted successfully"))
}

async fn remove_ticket(
    State(state): State<AppState>,
    Path((guid, index)): Path<(String, usize)>,
) -> AppResult<Json<Passenger>> {
    Ok(Json(state.trips.remove_ticket(&guid, index).await?))
}

async fn list_by_round_trip(State(state): State<AppState>, Path(flag): Path<String>) -> AppResult<Json<Vec<Trip>>> {
    let is_round_trip = flag.eq_ignore_ascii_case("true") || flag == "1";
    Ok(Json(state.trip_repo.find_by_round_trip(is_round_trip).await?))
}

async fn list_by_departing_flight(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<Vec<Trip>>> {
    Ok(Json(state.trip_repo.find_by_departing_flight(&guid).await?))
}

async fn list_by_returning_flight(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<Vec<Trip>>> {
    Ok(Json(state.trip_repo.find_by_returning_flight(&guid).await?))
}

async fn list_passengers(State(state): State<AppState>) -> AppResult<Json<Vec<Passenger>>> {
    Ok(Json(state.trip_repo.all_passengers().await?))
}

async fn passengers_by_trip(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<Vec<Passenger>>> {
    Ok(Json(state.trip_repo.passengers_by_trip(&guid).await?))
}

async fn passengers_by_flight(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<Vec<Passenger>>> {
    Ok(Json(state.trip_repo.passengers_by_flight(&guid).await?))
}
