use async_trait::async_trait;
use roam_core::repository::DestinationRepository;
use roam_core::{PopularDestination, RepoResult};
use sqlx::SqlitePool;

use crate::error::db_err;
use crate::hydrate::DestinationRow;

pub struct StoreDestinationRepository {
    pool: SqlitePool,
}

impl StoreDestinationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DestinationRepository for StoreDestinationRepository {
    async fn add(&self, destination: &PopularDestination) -> RepoResult<()> {
        sqlx::query("INSERT INTO popular_destinations (guid, name, image_path) VALUES (?, ?, ?)")
            .bind(&destination.guid)
            .bind(&destination.name)
            .bind(&destination.image_path)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn get_all(&self) -> RepoResult<Vec<PopularDestination>> {
        let rows: Vec<DestinationRow> =
            sqlx::query_as("SELECT guid, name, image_path FROM popular_destinations ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(rows.into_iter().map(PopularDestination::from).collect())
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<PopularDestination>> {
        let row: Option<DestinationRow> =
            sqlx::query_as("SELECT guid, name, image_path FROM popular_destinations WHERE guid = ?")
                .bind(guid)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(PopularDestination::from))
    }
}
