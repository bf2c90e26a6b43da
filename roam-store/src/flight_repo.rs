use async_trait::async_trait;
use roam_catalog::FlightSeats;
use roam_core::repository::FlightRepository;
use roam_core::{Flight, RepoResult};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::db_err;
use crate::hydrate::{self, FlightRow, FLIGHT_COLUMNS};
use crate::{cascade, inventory};

pub struct StoreFlightRepository {
    pool: SqlitePool,
}

impl StoreFlightRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, binds: &[&str]) -> RepoResult<Vec<Flight>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights f {clause} ORDER BY f.departure_time, f.guid");

        let mut query = sqlx::query_as::<_, FlightRow>(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&mut *conn).await.map_err(db_err)?;

        Ok(hydrate::flights_from_rows(&mut conn, rows).await?)
    }
}

#[async_trait]
impl FlightRepository for StoreFlightRepository {
    async fn add(&self, flight: &Flight) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        cascade::insert_flight(&mut tx, flight).await?;
        tx.commit().await.map_err(db_err)?;

        info!(flight_id = %flight.guid, "Flight stored with generated seat configuration");
        Ok(())
    }

    async fn get_all(&self) -> RepoResult<Vec<Flight>> {
        self.fetch_where("", &[]).await
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Flight>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        Ok(hydrate::flight(&mut conn, guid).await?)
    }

    async fn find_by_destination(&self, airport_guid: &str) -> RepoResult<Vec<Flight>> {
        self.fetch_where("WHERE f.arrival_airport_id = ?", &[airport_guid]).await
    }

    async fn find_by_departure(&self, airport_guid: &str) -> RepoResult<Vec<Flight>> {
        self.fetch_where("WHERE f.departure_airport_id = ?", &[airport_guid]).await
    }

    async fn find_by_airline(&self, airline_guid: &str) -> RepoResult<Vec<Flight>> {
        self.fetch_where("WHERE f.airline_id = ?", &[airline_guid]).await
    }

    async fn search(&self, departure_airport: &str, arrival_airport: &str) -> RepoResult<Vec<Flight>> {
        self.fetch_where(
            "WHERE f.departure_airport_id = ? AND f.arrival_airport_id = ?",
            &[departure_airport, arrival_airport],
        )
        .await
    }

    async fn delete(&self, guid: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM flights WHERE guid = ?")
            .bind(guid)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn seats_for_flight(&self, flight_guid: &str) -> RepoResult<Option<FlightSeats>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let found = inventory::load_for_flight(&mut conn, flight_guid).await?;
        Ok(found.map(|v| v.seats))
    }

    async fn seats_by_guid(&self, seats_guid: &str) -> RepoResult<Option<FlightSeats>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let found = inventory::load_by_guid(&mut conn, seats_guid).await?;
        Ok(found.map(|v| v.seats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbClient;
    use crate::fixtures;
    use roam_catalog::TOTAL_SEATS;
    use roam_core::{Layover, RepositoryError};

    #[tokio::test]
    async fn test_add_cascades_and_generates_seats() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreFlightRepository::new(db.pool.clone());

        let mut flight = fixtures::flight("fl-1", fixtures::lisbon(), fixtures::madrid());
        flight.layover = Some(Layover {
            guid: "lay-1".to_string(),
            airport: fixtures::airport("ap-opo", "OPO", "PT"),
            duration_minutes: 45,
        });
        repo.add(&flight).await.unwrap();

        let stored = repo.get_by_guid("fl-1").await.unwrap().unwrap();
        assert_eq!(stored.airline.icao_code.as_deref(), Some("RMA"));
        assert_eq!(stored.departure_airport.iata_code.as_deref(), Some("LIS"));
        assert_eq!(stored.layover.as_ref().unwrap().airport.short_name, "OPO");

        let seats = repo.seats_for_flight("fl-1").await.unwrap().unwrap();
        assert_eq!(seats.seat_configuration.len(), TOTAL_SEATS as usize);
        assert_eq!(stored.seat_configuration_id.as_deref(), Some(seats.guid.as_str()));
        assert_eq!(
            seats.seats_available as usize,
            seats.seat_configuration.iter().filter(|s| s.available).count()
        );

        let by_guid = repo.seats_by_guid(&seats.guid).await.unwrap().unwrap();
        assert_eq!(by_guid, seats);
    }

    #[tokio::test]
    async fn test_existing_references_are_reused() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreFlightRepository::new(db.pool.clone());

        repo.add(&fixtures::flight("fl-out", fixtures::lisbon(), fixtures::madrid()))
            .await
            .unwrap();

        // Same airline and airports under their known GUIDs, with stale nested data.
        let mut back = fixtures::flight("fl-back", fixtures::madrid(), fixtures::lisbon());
        back.airline.name = "Renamed".to_string();
        repo.add(&back).await.unwrap();

        let stored = repo.get_by_guid("fl-back").await.unwrap().unwrap();
        assert_eq!(stored.airline.name, "Roam Air");
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_flight_guid() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreFlightRepository::new(db.pool.clone());

        let flight = fixtures::flight("fl-1", fixtures::lisbon(), fixtures::madrid());
        repo.add(&flight).await.unwrap();
        let err = repo.add(&flight).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_queries_by_airport_and_airline() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreFlightRepository::new(db.pool.clone());

        repo.add(&fixtures::flight("fl-out", fixtures::lisbon(), fixtures::madrid()))
            .await
            .unwrap();
        repo.add(&fixtures::flight("fl-back", fixtures::madrid(), fixtures::lisbon()))
            .await
            .unwrap();

        let into_madrid = repo.find_by_destination("ap-mad").await.unwrap();
        assert_eq!(into_madrid.len(), 1);
        assert_eq!(into_madrid[0].guid, "fl-out");

        let from_madrid = repo.find_by_departure("ap-mad").await.unwrap();
        assert_eq!(from_madrid[0].guid, "fl-back");

        assert_eq!(repo.find_by_airline("al-roam").await.unwrap().len(), 2);

        let found = repo.search("ap-lis", "ap-mad").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].guid, "fl-out");
        assert!(repo.search("ap-lis", "ap-lis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_drops_seat_configuration() {
        let db = DbClient::in_memory().await.unwrap();
        let repo = StoreFlightRepository::new(db.pool.clone());

        repo.add(&fixtures::flight("fl-1", fixtures::lisbon(), fixtures::madrid()))
            .await
            .unwrap();
        assert!(repo.delete("fl-1").await.unwrap());
        assert!(repo.seats_for_flight("fl-1").await.unwrap().is_none());
        assert!(!repo.delete("fl-1").await.unwrap());
    }
}
