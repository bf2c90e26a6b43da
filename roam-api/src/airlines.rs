use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use roam_core::Airline;
use serde_json::Value;

use crate::bulk::{created, message, OneOrMany};
use crate::error::{AppError, AppJson, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/airlines", get(list_airlines).post(create_airlines))
        .route("/api/airlines/icao/{code}", get(get_by_icao))
        .route("/api/airlines/{guid}", get(get_airline).delete(delete_airline))
}

async fn create_airlines(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OneOrMany<Airline>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let airlines = payload.into_vec();
    for airline in &airlines {
        state.airline_repo.add(airline).await?;
    }
    Ok(created(airlines.len(), "airline"))
}

async fn list_airlines(State(state): State<AppState>) -> AppResult<Json<Vec<Airline>>> {
    Ok(Json(state.airline_repo.get_all().await?))
}

async fn get_airline(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Airline>> {
    state
        .airline_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Airline not found".to_string()))
}

async fn get_by_icao(State(state): State<AppState>, Path(code): Path<String>) -> AppResult<Json<Airline>> {
    state
        .airline_repo
        .find_by_icao_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Airline not found".to_string()))
}

async fn delete_airline(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Value>> {
    if !state.airline_repo.delete(&guid).await? {
        return Err(AppError::NotFoundError("Airline not found".to_string()));
    }
    Ok(message("Airline deleted successfully"))
}
