use async_trait::async_trait;
use roam_core::repository::AirportRepository;
use roam_core::{Airport, RepoResult};
use sqlx::SqlitePool;

use crate::cascade;
use crate::error::db_err;
use crate::hydrate::{self, AirportRow, AIRPORT_COLUMNS};

pub struct StoreAirportRepository {
    pool: SqlitePool,
}

impl StoreAirportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AirportRepository for StoreAirportRepository {
    async fn add(&self, airport: &Airport) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        cascade::insert_airport(&mut tx, airport).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn get_all(&self) -> RepoResult<Vec<Airport>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let rows: Vec<AirportRow> =
            sqlx::query_as(&format!("SELECT {AIRPORT_COLUMNS} FROM airports a ORDER BY a.full_name"))
                .fetch_all(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(hydrate::airports_from_rows(&mut conn, rows).await?)
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Airport>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        Ok(hydrate::airport(&mut conn, guid).await?)
    }

    async fn find_by_iata_code(&self, iata_code: &str) -> RepoResult<Option<Airport>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let row: Option<AirportRow> =
            sqlx::query_as(&format!("SELECT {AIRPORT_COLUMNS} FROM airports a WHERE a.iata_code = ?"))
                .bind(iata_code)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;

        match row {
            Some(row) => Ok(Some(hydrate::airport_from_row(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_country_code(&self, country_code: &str) -> RepoResult<Vec<Airport>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let rows: Vec<AirportRow> = sqlx::query_as(&format!(
            "SELECT {AIRPORT_COLUMNS} FROM airports a JOIN countries c ON a.country_id = c.guid \
             WHERE c.code = ? ORDER BY a.full_name"
        ))
        .bind(country_code)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(hydrate::airports_from_rows(&mut conn, rows).await?)
    }

    async fn delete(&self, guid: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM airports WHERE guid = ?")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbClient;
    use crate::fixtures;
    use roam_core::RepositoryError;

    #[tokio::test]
    async fn test_add_creates_country_and_continent() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreAirportRepository::new(db.pool.clone());

        repo.add(&fixtures::airport("ap-lis", "LIS", "PT")).await.unwrap();
        repo.add(&fixtures::airport("ap-opo", "OPO", "PT")).await.unwrap();

        let lis = repo.find_by_iata_code("LIS").await.unwrap().unwrap();
        let country = lis.country.unwrap();
        assert_eq!(country.code, "PT");
        assert_eq!(country.continent.unwrap().code, "EU");
        assert!(lis.location.is_some());

        let portuguese = repo.find_by_country_code("PT").await.unwrap();
        assert_eq!(portuguese.len(), 2);
        assert!(repo.find_by_country_code("ES").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_guid_is_rejected() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreAirportRepository::new(db.pool.clone());

        repo.add(&fixtures::airport("ap-lis", "LIS", "PT")).await.unwrap();
        let err = repo.add(&fixtures::airport("ap-lis", "LIX", "PT")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreAirportRepository::new(db.pool.clone());

        repo.add(&fixtures::airport("ap-lis", "LIS", "PT")).await.unwrap();
        assert!(repo.delete("ap-lis").await.unwrap());
        assert!(repo.get_by_guid("ap-lis").await.unwrap().is_none());
        assert!(!repo.delete("ap-lis").await.unwrap());
    }
}
