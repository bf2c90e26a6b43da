use roam_catalog::DoubleBooking;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Fail trip creation when a requested seat is already taken instead of
    /// accepting it as booked.
    pub reject_taken_seats: bool,
    pub popular_destination_limit: usize,
}

impl BookingConfig {
    pub fn double_booking(&self) -> DoubleBooking {
        if self.reject_taken_seats {
            DoubleBooking::Reject
        } else {
            DoubleBooking::Allow
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://roam.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "change-me")?
            .set_default("auth.jwt_expiration_seconds", 3600)?
            .set_default("booking.reject_taken_seats", false)?
            .set_default("booking.popular_destination_limit", 5)?
            .add_source(config::File::with_name("config/default").required(false))
            // Optional per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local settings, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // ROAM__DATABASE__URL=sqlite://other.db and friends
            .add_source(
                config::Environment::with_prefix("ROAM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_booking_flag() {
        let mut booking = BookingConfig {
            reject_taken_seats: false,
            popular_destination_limit: 5,
        };
        assert_eq!(booking.double_booking(), DoubleBooking::Allow);
        booking.reject_taken_seats = true;
        assert_eq!(booking.double_booking(), DoubleBooking::Reject);
    }
}
