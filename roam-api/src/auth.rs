use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use roam_core::User;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppJson, AppResult};
use crate::middleware::auth::Claims;
use crate::state::{AppState, AuthConfig};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    guid: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

/// Signs an HS256 token for `user` valid for the configured lifetime.
pub fn issue_token(auth: &AuthConfig, user: &User) -> AppResult<String> {
    let expires_at = i64::try_from(auth.expiration)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            AppError::InternalServerError(format!("Token lifetime of {}s is out of range", auth.expiration))
        })?;

    let claims = Claims {
        sub: user.guid.clone(),
        email: user.email.clone(),
        exp: expires_at.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state.accounts.authenticate(&payload.email, &payload.password).await?;
    let token = issue_token(&state.auth, &user)?;
    tracing::info!(user_id = %user.guid, "User logged in");

    Ok(Json(AuthResponse { token, guid: user.guid }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn user() -> User {
        User {
            guid: "u-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_issue_token_round_trips_claims() {
        let auth = AuthConfig {
            secret: "secret".to_string(),
            expiration: 60,
        };
        let token = issue_token(&auth, &user()).unwrap();

        let data = decode::<Claims>(&token, &DecodingKey::from_secret(b"secret"), &Validation::default()).unwrap();
        assert_eq!(data.claims.sub, "u-1");
        assert_eq!(data.claims.email, "ada@example.com");
        assert!(data.claims.exp as i64 > Utc::now().timestamp());
    }

    #[test]
    fn test_oversized_lifetime_is_rejected() {
        for expiration in [u64::MAX, i64::MAX as u64] {
            let auth = AuthConfig {
                secret: "secret".to_string(),
                expiration,
            };
            assert!(matches!(
                issue_token(&auth, &user()),
                Err(AppError::InternalServerError(_))
            ));
        }
    }
}
