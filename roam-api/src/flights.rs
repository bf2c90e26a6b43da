use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use roam_catalog::FlightSeats;
use roam_core::search::FlightSearchRequest;
use roam_core::Flight;
use serde_json::Value;

use crate::bulk::{created, message, OneOrMany};
use crate::error::{AppError, AppJson, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights).post(create_flights))
        .route("/api/flights/search", post(search_flights))
        .route("/api/flights/destination/{airport}", get(list_by_destination))
        .route("/api/flights/departure/{airport}", get(list_by_departure))
        .route("/api/flights/airline/{airline}", get(list_by_airline))
        .route("/api/flights/{guid}", get(get_flight).delete(delete_flight))
        // Seat configurations
        .route("/api/flight/{guid}/seats", get(seats_for_flight))
        .route("/api/flight/seats/{guid}", get(seats_by_guid))
}

async fn create_flights(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OneOrMany<Flight>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let flights = payload.into_vec();
    for flight in &flights {
        state.flight_repo.add(flight).await?;
    }
    Ok(created(flights.len(), "flight"))
}

async fn list_flights(State(state): State<AppState>) -> AppResult<Json<Vec<Flight>>> {
    Ok(Json(state.flight_repo.get_all().await?))
}

async fn get_flight(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Flight>> {
    state
        .flight_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Flight not found".to_string()))
}

async fn delete_flight(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Value>> {
    if !state.flight_repo.delete(&guid).await? {
        return Err(AppError::NotFoundError("Flight not found".to_string()));
    }
    Ok(message("Flight deleted successfully"))
}

async fn list_by_destination(
    State(state): State<AppState>,
    Path(airport): Path<String>,
) -> AppResult<Json<Vec<Flight>>> {
    Ok(Json(state.flight_repo.find_by_destination(&airport).await?))
}

async fn list_by_departure(
    State(state): State<AppState>,
    Path(airport): Path<String>,
) -> AppResult<Json<Vec<Flight>>> {
    Ok(Json(state.flight_repo.find_by_departure(&airport).await?))
}

async fn list_by_airline(
    State(state): State<AppState>,
    Path(airline): Path<String>,
) -> AppResult<Json<Vec<Flight>>> {
    Ok(Json(state.flight_repo.find_by_airline(&airline).await?))
}

async fn search_flights(
    State(state): State<AppState>,
    AppJson(req): AppJson<FlightSearchRequest>,
) -> AppResult<Json<Vec<Flight>>> {
    tracing::debug!(from = %req.departure_airport_id, to = %req.arrival_airport_id, "Flight search");
    let flights = state
        .flight_repo
        .search(&req.departure_airport_id, &req.arrival_airport_id)
        .await?;
    Ok(Json(flights))
}

async fn seats_for_flight(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<FlightSeats>> {
    Ok(Json(state.seats.for_flight(&guid).await?))
}

async fn seats_by_guid(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<FlightSeats>> {
    Ok(Json(state.seats.by_guid(&guid).await?))
}
