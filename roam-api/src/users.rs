use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use roam_core::requests::{NewUser, UserUpdate};
use roam_core::User;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::bulk::message;
use crate::error::{AppError, AppJson, AppResult};
use crate::middleware::{bearer_auth_middleware, Claims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/users/protected", get(protected))
        .route_layer(middleware::from_fn_with_state(state, bearer_auth_middleware));

    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/check-email", get(check_email))
        .route(
            "/api/users/{guid}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .merge(protected)
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewUser>,
) -> AppResult<(StatusCode, Json<Value>)> {
    state.accounts.register(payload).await?;
    Ok((StatusCode::CREATED, message("User created successfully")))
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.user_repo.get_all().await?))
}

async fn get_user(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<User>> {
    state
        .user_repo
        .get_by_guid(&guid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))
}

async fn update_user(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    AppJson(payload): AppJson<UserUpdate>,
) -> AppResult<Json<Value>> {
    state.accounts.update(&guid, payload).await?;
    Ok(message("User updated successfully"))
}

async fn delete_user(State(state): State<AppState>, Path(guid): Path<String>) -> AppResult<Json<Value>> {
    if !state.user_repo.delete(&guid).await? {
        return Err(AppError::NotFoundError("User not found".to_string()));
    }
    Ok(message("User deleted successfully"))
}

async fn check_email(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> AppResult<Json<Value>> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::ValidationError("Email parameter is required".to_string()))?;

    let exists = state.accounts.email_exists(&email).await?;
    Ok(Json(json!({ "exists": exists })))
}

async fn protected(Extension(claims): Extension<Claims>) -> Json<&'static str> {
    tracing::debug!(user_id = %claims.sub, "Protected endpoint reached");
    Json("success")
}
