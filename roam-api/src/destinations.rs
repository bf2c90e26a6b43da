use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use roam_core::PopularDestination;
use serde_json::Value;

use crate::bulk::{created, OneOrMany};
use crate::error::{AppError, AppJson, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/destination", post(create_destinations))
        .route("/api/destination/all", get(list_destinations))
        .route("/api/destination/popular", get(popular_destinations))
        .route("/api/destination/{guid}", get(get_destination))
}

async fn create_destinations(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OneOrMany<PopularDestination>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let destinations = payload.into_vec();
    for destination in &destinations {
        state.destination_repo.add(destination).await?;
    }
    Ok(created(destinations.len(), "destination"))
}

async fn list_destinations(State(state): State<AppState>) -> AppResult<Json<Vec<PopularDestination>>> {
    Ok(Json(state.destination_repo.get_all().await?))
}

async fn popular_destinations(State(state): State<AppState>) -> AppResult<Json<Vec<PopularDestination>>> {
    Ok(Json(state.destinations.popular().await?))
}

async fn get_destination(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<PopularDestination>> {
    state
        .destination_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Destination not found".to_string()))
}
