use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use roam_core::Airport;
use serde_json::Value;

use crate::bulk::{created, message, OneOrMany};
use crate::error::{AppError, AppJson, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/airports", get(list_airports).post(create_airports))
        .route("/api/airports/iata/{code}", get(get_by_iata))
        .route("/api/airports/country/{code}", get(list_by_country))
        .route("/api/airports/{guid}", get(get_airport).delete(delete_airport))
}

async fn create_airports(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OneOrMany<Airport>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let airports = payload.into_vec();
    for airport in &airports {
        state.airport_repo.add(airport).await?;
    }
    Ok(created(airports.len(), "airport"))
}

async fn list_airports(State(state): State<AppState>) -> AppResult<Json<Vec<Airport>>> {
    Ok(Json(state.airport_repo.get_all().await?))
}

async fn get_airport(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Airport>> {
    state
        .airport_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Airport not found".to_string()))
}

async fn get_by_iata(State(state): State<AppState>, Path(code): Path<String>) -> AppResult<Json<Airport>> {
    state
        .airport_repo
        .find_by_iata_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Airport not found".to_string()))
}

async fn list_by_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Vec<Airport>>> {
    Ok(Json(state.airport_repo.find_by_country_code(&code).await?))
}

async fn delete_airport(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Value>> {
    if !state.airport_repo.delete(&guid).await? {
        return Err(AppError::NotFoundError("Airport not found".to_string()));
    }
    Ok(message("Airport deleted successfully"))
}
