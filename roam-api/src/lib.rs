use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use roam_store::app_config::CorsConfig;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod airlines;
pub mod airports;
pub mod auth;
pub mod bulk;
pub mod destinations;
pub mod error;
pub mod flights;
pub mod middleware;
pub mod state;
pub mod trips;
pub mod users;

pub use state::AppState;

pub fn app(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(users::routes(state.clone()))
        .merge(airlines::routes())
        .merge(airports::routes())
        .merge(flights::routes())
        .merge(trips::routes())
        .merge(destinations::routes())
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = if cors.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT])
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
