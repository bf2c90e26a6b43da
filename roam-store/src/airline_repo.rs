use async_trait::async_trait;
use roam_core::repository::AirlineRepository;
use roam_core::{Airline, RepoResult};
use sqlx::SqlitePool;

use crate::cascade;
use crate::error::db_err;
use crate::hydrate::AirlineRow;

pub struct StoreAirlineRepository {
    pool: SqlitePool,
}

impl StoreAirlineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AirlineRepository for StoreAirlineRepository {
    async fn add(&self, airline: &Airline) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        cascade::insert_airline(&mut conn, airline).await?;
        Ok(())
    }

    async fn get_all(&self) -> RepoResult<Vec<Airline>> {
        let rows: Vec<AirlineRow> =
            sqlx::query_as("SELECT guid, icao_code, name, logo_path FROM airlines ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(rows.into_iter().map(Airline::from).collect())
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Airline>> {
        let row: Option<AirlineRow> =
            sqlx::query_as("SELECT guid, icao_code, name, logo_path FROM airlines WHERE guid = ?")
                .bind(guid)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Airline::from))
    }

    async fn find_by_icao_code(&self, icao_code: &str) -> RepoResult<Option<Airline>> {
        let row: Option<AirlineRow> =
            sqlx::query_as("SELECT guid, icao_code, name, logo_path FROM airlines WHERE icao_code = ?")
                .bind(icao_code)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Airline::from))
    }

    async fn delete(&self, guid: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM airlines WHERE guid = ?")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
