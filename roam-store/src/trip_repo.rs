use async_trait::async_trait;
use roam_catalog::{BookOutcome, DoubleBooking, SeatId};
use roam_core::repository::{SeatAssignment, TripRepository};
use roam_core::{Passenger, RepoResult, Trip};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{db_err, StoreResult};
use crate::hydrate::{self, PassengerRow, TripRow, PASSENGER_COLUMNS, TRIP_COLUMNS};
use crate::{cascade, inventory};

pub struct StoreTripRepository {
    pool: SqlitePool,
}

impl StoreTripRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, bind: Option<&str>) -> RepoResult<Vec<Trip>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let sql = format!("SELECT {TRIP_COLUMNS} FROM trips t {clause} ORDER BY t.rowid");

        let mut query = sqlx::query_as::<_, TripRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&mut *conn).await.map_err(db_err)?;

        Ok(hydrate::trips_from_rows(&mut conn, rows).await?)
    }

    async fn fetch_passengers(&self, sql: &str, binds: &[&str]) -> RepoResult<Vec<Passenger>> {
        let mut query = sqlx::query_as::<_, PassengerRow>(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Passenger::from).collect())
    }
}

async fn insert_trip_row(conn: &mut SqliteConnection, trip: &Trip) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO trips (guid, name, is_round_trip, departure_date, return_date, \
         departing_flight_id, returning_flight_id) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&trip.guid)
    .bind(&trip.name)
    .bind(trip.is_round_trip)
    .bind(trip.departure_date)
    .bind(trip.return_date)
    .bind(&trip.departing_flight.guid)
    .bind(trip.returning_flight.as_ref().map(|f| f.guid.as_str()))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Whether this booking is what marked the passenger's seat on `flight_guid` taken.
fn flipped(assignments: &[SeatAssignment], flight_guid: &str, passenger: &Passenger) -> bool {
    assignments.iter().any(|a| {
        a.flight_id == flight_guid && a.passenger_id == passenger.guid && a.outcome == BookOutcome::Booked
    })
}

async fn insert_passenger(
    conn: &mut SqliteConnection,
    trip: &Trip,
    position: usize,
    passenger: &Passenger,
    assignments: &[SeatAssignment],
) -> StoreResult<()> {
    let departing_booked = flipped(assignments, &trip.departing_flight.guid, passenger);
    let returning_booked = trip
        .returning_flight
        .as_ref()
        .is_some_and(|f| flipped(assignments, &f.guid, passenger));

    sqlx::query(
        "INSERT INTO passengers (guid, trip_id, position, name, age, departing_seat_id, returning_seat_id, \
         departing_seat_booked, returning_seat_booked) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&passenger.guid)
    .bind(&passenger.trip_id)
    .bind(position as i64)
    .bind(&passenger.name)
    .bind(passenger.age)
    .bind(passenger.departing_seat_id)
    .bind(passenger.returning_seat_id)
    .bind(departing_booked)
    .bind(returning_booked)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Books one leg's seats for every passenger and writes the map back.
async fn book_leg(
    conn: &mut SqliteConnection,
    trip: &Trip,
    flight_guid: &str,
    returning: bool,
    policy: DoubleBooking,
    assignments: &mut Vec<SeatAssignment>,
) -> StoreResult<()> {
    let mut current = inventory::load_or_generate(conn, flight_guid).await?;

    for passenger in &trip.passengers {
        let seat_id = if returning {
            match passenger.returning_seat_id {
                Some(id) => id,
                None => continue,
            }
        } else {
            passenger.departing_seat_id
        };

        let outcome = current.seats.book(seat_id, policy)?;
        debug!(trip_id = %trip.guid, flight_id = flight_guid, seat_id, ?outcome, "Seat booked");
        assignments.push(SeatAssignment {
            flight_id: flight_guid.to_string(),
            passenger_id: passenger.guid.clone(),
            seat_id,
            outcome,
        });
    }

    inventory::save(conn, &current).await
}

/// Seat ownership of one passenger, as stored.
#[derive(sqlx::FromRow)]
struct HeldRow {
    guid: String,
    departing_seat_id: SeatId,
    returning_seat_id: Option<SeatId>,
    departing_seat_booked: bool,
    returning_seat_booked: bool,
}

async fn held_rows(conn: &mut SqliteConnection, trip_guid: &str) -> StoreResult<Vec<HeldRow>> {
    Ok(sqlx::query_as(
        "SELECT guid, departing_seat_id, returning_seat_id, departing_seat_booked, returning_seat_booked \
         FROM passengers WHERE trip_id = ? ORDER BY position",
    )
    .bind(trip_guid)
    .fetch_all(&mut *conn)
    .await?)
}

/// Seats this passenger's booking marked taken, keyed by the flight they are on.
/// Seats that were already taken when booked are left alone.
fn held_seats<'a>(row: &'a TripRow, held: &HeldRow) -> Vec<(&'a str, SeatId)> {
    let mut seats = Vec::new();
    if held.departing_seat_booked {
        seats.push((row.departing_flight_id(), held.departing_seat_id));
    }
    if let (Some(flight), Some(seat), true) =
        (row.returning_flight_id(), held.returning_seat_id, held.returning_seat_booked)
    {
        seats.push((flight, seat));
    }
    seats
}

async fn release_all(conn: &mut SqliteConnection, held: Vec<(&str, SeatId)>) -> StoreResult<()> {
    let mut by_flight: Vec<(&str, Vec<SeatId>)> = Vec::new();
    for (flight, seat) in held {
        match by_flight.iter_mut().find(|(f, _)| *f == flight) {
            Some((_, seats)) => seats.push(seat),
            None => by_flight.push((flight, vec![seat])),
        }
    }
    for (flight, seats) in by_flight {
        inventory::release(conn, flight, &seats).await?;
    }
    Ok(())
}

async fn trip_row(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<TripRow>> {
    Ok(
        sqlx::query_as(&format!("SELECT {TRIP_COLUMNS} FROM trips t WHERE t.guid = ?"))
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?,
    )
}

#[async_trait]
impl TripRepository for StoreTripRepository {
    async fn create(&self, trip: &Trip, policy: DoubleBooking) -> RepoResult<Vec<SeatAssignment>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Writing first takes the database write lock before any seat map is read.
        insert_trip_row(&mut tx, trip).await?;

        for flight in trip.flights() {
            cascade::ensure_flight(&mut tx, flight).await?;
        }

        let mut assignments = Vec::new();
        book_leg(&mut tx, trip, &trip.departing_flight.guid, false, policy, &mut assignments).await?;
        if let Some(returning) = &trip.returning_flight {
            book_leg(&mut tx, trip, &returning.guid, true, policy, &mut assignments).await?;
        }

        for (position, passenger) in trip.passengers.iter().enumerate() {
            insert_passenger(&mut tx, trip, position, passenger, &assignments).await?;
        }

        tx.commit().await.map_err(db_err)?;

        info!(trip_id = %trip.guid, passengers = trip.passengers.len(), "Trip booked");
        Ok(assignments)
    }

    async fn get_all(&self) -> RepoResult<Vec<Trip>> {
        self.fetch_where("", None).await
    }

    async fn get_by_guid(&self, guid: &str) -> RepoResult<Option<Trip>> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        match trip_row(&mut conn, guid).await? {
            Some(row) => Ok(Some(hydrate::trip_from_row(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_round_trip(&self, is_round_trip: bool) -> RepoResult<Vec<Trip>> {
        let clause = if is_round_trip {
            "WHERE t.is_round_trip = 1"
        } else {
            "WHERE t.is_round_trip = 0"
        };
        self.fetch_where(clause, None).await
    }

    async fn find_by_departing_flight(&self, flight_guid: &str) -> RepoResult<Vec<Trip>> {
        self.fetch_where("WHERE t.departing_flight_id = ?", Some(flight_guid)).await
    }

    async fn find_by_returning_flight(&self, flight_guid: &str) -> RepoResult<Vec<Trip>> {
        self.fetch_where("WHERE t.returning_flight_id = ?", Some(flight_guid)).await
    }

    async fn delete(&self, guid: &str) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let Some(row) = trip_row(&mut tx, guid).await? else {
            return Ok(false);
        };
        let passengers = held_rows(&mut tx, guid).await?;

        sqlx::query("DELETE FROM trips WHERE guid = ?")
            .bind(guid)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let held = passengers.iter().flat_map(|p| held_seats(&row, p)).collect();
        release_all(&mut tx, held).await?;

        tx.commit().await.map_err(db_err)?;
        info!(trip_id = guid, "Trip deleted and seats released");
        Ok(true)
    }

    async fn remove_passenger(&self, trip_guid: &str, index: usize) -> RepoResult<Option<Passenger>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let Some(row) = trip_row(&mut tx, trip_guid).await? else {
            return Ok(None);
        };
        let passengers = hydrate::passengers(&mut tx, trip_guid).await?;
        let Some(passenger) = passengers.into_iter().nth(index) else {
            return Ok(None);
        };
        let held = held_rows(&mut tx, trip_guid)
            .await?
            .into_iter()
            .find(|h| h.guid == passenger.guid);

        sqlx::query("DELETE FROM passengers WHERE guid = ?")
            .bind(&passenger.guid)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        if let Some(held) = held {
            release_all(&mut tx, held_seats(&row, &held)).await?;
        }

        tx.commit().await.map_err(db_err)?;
        info!(trip_id = trip_guid, passenger_id = %passenger.guid, "Ticket removed");
        Ok(Some(passenger))
    }

    async fn all_passengers(&self) -> RepoResult<Vec<Passenger>> {
        self.fetch_passengers(
            &format!(
                "SELECT {PASSENGER_COLUMNS} FROM passengers p JOIN trips t ON p.trip_id = t.guid \
                 ORDER BY t.rowid, p.position"
            ),
            &[],
        )
        .await
    }

    async fn passengers_by_trip(&self, trip_guid: &str) -> RepoResult<Vec<Passenger>> {
        self.fetch_passengers(
            &format!("SELECT {PASSENGER_COLUMNS} FROM passengers p WHERE p.trip_id = ? ORDER BY p.position"),
            &[trip_guid],
        )
        .await
    }

    async fn passengers_by_flight(&self, flight_guid: &str) -> RepoResult<Vec<Passenger>> {
        self.fetch_passengers(
            &format!(
                "SELECT {PASSENGER_COLUMNS} FROM passengers p JOIN trips t ON p.trip_id = t.guid \
                 WHERE t.departing_flight_id = ? OR t.returning_flight_id = ? \
                 ORDER BY t.rowid, p.position"
            ),
            &[flight_guid, flight_guid],
        )
        .await
    }
}
