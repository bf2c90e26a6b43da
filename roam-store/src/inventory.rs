//! Persistence of per-flight seat configurations.
//!
//! The seat map is stored as a JSON array next to a `version` counter. Every
//! write is conditional on the version it read, so two transactions can never
//! both apply a change computed from the same snapshot.

use roam_catalog::{FlightSeats, Seat, SeatId};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

#[derive(sqlx::FromRow)]
struct SeatsRow {
    guid: String,
    flight_id: String,
    seat_configuration: String,
    version: i64,
}

/// A seat configuration together with the version it was read at.
pub(crate) struct VersionedSeats {
    pub seats: FlightSeats,
    pub version: i64,
}

impl TryFrom<SeatsRow> for VersionedSeats {
    type Error = StoreError;

    fn try_from(row: SeatsRow) -> StoreResult<Self> {
        let seat_configuration: Vec<Seat> = serde_json::from_str(&row.seat_configuration)?;
        let seats_available = seat_configuration.iter().filter(|s| s.available).count() as i32;
        Ok(Self {
            seats: FlightSeats {
                guid: row.guid,
                flight_id: row.flight_id,
                seats_available,
                seat_configuration,
            },
            version: row.version,
        })
    }
}

pub(crate) async fn load_for_flight(
    conn: &mut SqliteConnection,
    flight_guid: &str,
) -> StoreResult<Option<VersionedSeats>> {
    let row: Option<SeatsRow> = sqlx::query_as(
        "SELECT guid, flight_id, seat_configuration, version FROM flight_seats WHERE flight_id = ?",
    )
    .bind(flight_guid)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(VersionedSeats::try_from).transpose()
}

pub(crate) async fn load_by_guid(
    conn: &mut SqliteConnection,
    seats_guid: &str,
) -> StoreResult<Option<VersionedSeats>> {
    let row: Option<SeatsRow> = sqlx::query_as(
        "SELECT guid, flight_id, seat_configuration, version FROM flight_seats WHERE guid = ?",
    )
    .bind(seats_guid)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(VersionedSeats::try_from).transpose()
}

pub(crate) async fn insert(conn: &mut SqliteConnection, seats: &FlightSeats) -> StoreResult<()> {
    let encoded = serde_json::to_string(&seats.seat_configuration)?;
    sqlx::query(
        "INSERT INTO flight_seats (guid, flight_id, seats_available, seat_configuration, version) \
         VALUES (?, ?, ?, ?, 0)",
    )
    .bind(&seats.guid)
    .bind(&seats.flight_id)
    .bind(seats.seats_available)
    .bind(encoded)
    .execute(&mut *conn)
    .await?;

    debug!(flight_id = %seats.flight_id, seats_available = seats.seats_available, "Seat configuration created");
    Ok(())
}

/// Loads the flight's seats, generating and storing a fresh configuration
/// when the flight has none yet.
pub(crate) async fn load_or_generate(
    conn: &mut SqliteConnection,
    flight_guid: &str,
) -> StoreResult<VersionedSeats> {
    if let Some(existing) = load_for_flight(conn, flight_guid).await? {
        return Ok(existing);
    }

    let seats = FlightSeats::generate(flight_guid, &mut rand::thread_rng());
    insert(conn, &seats).await?;
    Ok(VersionedSeats { seats, version: 0 })
}

/// Writes back a configuration read at `version`.
pub(crate) async fn save(conn: &mut SqliteConnection, current: &VersionedSeats) -> StoreResult<()> {
    let encoded = serde_json::to_string(&current.seats.seat_configuration)?;
    let result = sqlx::query(
        "UPDATE flight_seats SET seats_available = ?, seat_configuration = ?, version = version + 1 \
         WHERE guid = ? AND version = ?",
    )
    .bind(current.seats.seats_available)
    .bind(encoded)
    .bind(&current.seats.guid)
    .bind(current.version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(format!(
            "Seat configuration for flight {} changed concurrently",
            current.seats.flight_id
        )));
    }
    Ok(())
}

/// Frees seats that a removed passenger's booking had marked taken.
///
/// A seat another passenger still sits in stays taken, and that passenger
/// becomes the one whose departure frees it.
pub(crate) async fn release(
    conn: &mut SqliteConnection,
    flight_guid: &str,
    seat_ids: &[SeatId],
) -> StoreResult<()> {
    let Some(mut current) = load_for_flight(conn, flight_guid).await? else {
        return Ok(());
    };

    let mut changed = false;
    for &seat_id in seat_ids {
        if hand_over(conn, flight_guid, seat_id).await? {
            debug!(flight_id = flight_guid, seat_id, "Seat still held by another passenger");
            continue;
        }
        current.seats.release(seat_id)?;
        changed = true;
    }

    if changed {
        save(conn, &current).await?;
        debug!(flight_id = flight_guid, seats = ?seat_ids, "Seats released");
    }
    Ok(())
}

/// Marks one remaining holder of the seat as its owner. Returns whether any
/// passenger still holds it.
async fn hand_over(conn: &mut SqliteConnection, flight_guid: &str, seat_id: SeatId) -> StoreResult<bool> {
    let departing = sqlx::query(
        "UPDATE passengers SET departing_seat_booked = 1 WHERE guid = ( \
         SELECT p.guid FROM passengers p JOIN trips t ON p.trip_id = t.guid \
         WHERE t.departing_flight_id = ? AND p.departing_seat_id = ? LIMIT 1)",
    )
    .bind(flight_guid)
    .bind(seat_id)
    .execute(&mut *conn)
    .await?;
    if departing.rows_affected() > 0 {
        return Ok(true);
    }

    let returning = sqlx::query(
        "UPDATE passengers SET returning_seat_booked = 1 WHERE guid = ( \
         SELECT p.guid FROM passengers p JOIN trips t ON p.trip_id = t.guid \
         WHERE t.returning_flight_id = ? AND p.returning_seat_id = ? LIMIT 1)",
    )
    .bind(flight_guid)
    .bind(seat_id)
    .execute(&mut *conn)
    .await?;

    Ok(returning.rows_affected() > 0)
}
