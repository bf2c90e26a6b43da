use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone)]
pub struct DbClient {
    pub pool: SqlitePool,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(connection_string)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        info!(url = connection_string, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Private in-memory database with the schema applied. The pool keeps a
    /// single connection alive forever, since the data dies with it.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let client = Self { pool };
        client.migrate().await?;
        Ok(client)
    }

    /// Creates missing tables and columns. Safe to run on every start.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        info!("Applying database schema...");
        execute_sql(&self.pool, include_str!("../sql/schema.sql")).await?;

        add_missing_column(&self.pool, "passengers", "age", include_str!("../sql/passenger_age.sql")).await?;
        add_missing_column(
            &self.pool,
            "passengers",
            "departing_seat_booked",
            include_str!("../sql/passenger_seat_booked.sql"),
        )
        .await?;

        info!("Database schema ready.");
        Ok(())
    }
}

async fn add_missing_column(pool: &SqlitePool, table: &str, column: &str, sql: &str) -> Result<(), sqlx::Error> {
    let found: Option<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_optional(pool)
        .await?;
    if found.is_none() {
        debug!(table, column, "Adding missing column");
        execute_sql(pool, sql).await?;
    }
    Ok(())
}

/// Runs each `;`-separated statement, skipping `--` comment lines.
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<(), sqlx::Error> {
    for statement in sql.split(';') {
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = DbClient::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(
            names,
            vec![
                "airlines", "airports", "continents", "countries", "flight_seats", "flights",
                "layovers", "locations", "passengers", "popular_destinations", "trips", "users",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_columns_added_to_legacy_table() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE passengers (guid TEXT PRIMARY KEY, trip_id TEXT NOT NULL, position INTEGER NOT NULL, \
             name TEXT NOT NULL, departing_seat_id INTEGER NOT NULL, returning_seat_id INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let db = DbClient { pool };
        db.migrate().await.unwrap();

        let has_age: Option<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('passengers') WHERE name = 'age'")
                .fetch_optional(&db.pool)
                .await
                .unwrap();
        assert!(has_age.is_some());

        let booked: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM pragma_table_info('passengers') WHERE name LIKE '%_seat_booked' ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        assert_eq!(
            booked.into_iter().map(|(n,)| n).collect::<Vec<_>>(),
            vec!["departing_seat_booked", "returning_seat_booked"]
        );
    }
}
