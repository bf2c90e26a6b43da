//! Find-or-create of referenced entities, keyed by GUID.
//!
//! Nested records in a payload are only inserted when no row with their GUID
//! exists; an existing row wins and its nested data is left untouched. Every
//! helper runs on the caller's connection so the whole cascade shares the
//! top-level transaction.

use roam_catalog::FlightSeats;
use roam_core::{Airline, Airport, Continent, Country, Flight, Layover, Location};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::StoreResult;
use crate::inventory;

async fn exists(conn: &mut SqliteConnection, table: &'static str, guid: &str) -> StoreResult<bool> {
    let found: Option<(String,)> = sqlx::query_as(&format!("SELECT guid FROM {table} WHERE guid = ?"))
        .bind(guid)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn ensure_continent(conn: &mut SqliteConnection, continent: &Continent) -> StoreResult<()> {
    if exists(conn, "continents", &continent.guid).await? {
        return Ok(());
    }
    sqlx::query("INSERT INTO continents (guid, code, name) VALUES (?, ?, ?)")
        .bind(&continent.guid)
        .bind(&continent.code)
        .bind(&continent.name)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn ensure_country(conn: &mut SqliteConnection, country: &Country) -> StoreResult<()> {
    if exists(conn, "countries", &country.guid).await? {
        return Ok(());
    }
    if let Some(continent) = &country.continent {
        ensure_continent(conn, continent).await?;
    }
    sqlx::query("INSERT INTO countries (guid, code, name, continent_id) VALUES (?, ?, ?, ?)")
        .bind(&country.guid)
        .bind(&country.code)
        .bind(&country.name)
        .bind(country.continent.as_ref().map(|c| c.guid.as_str()))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn ensure_location(conn: &mut SqliteConnection, location: &Location) -> StoreResult<()> {
    if exists(conn, "locations", &location.guid).await? {
        return Ok(());
    }
    sqlx::query("INSERT INTO locations (guid, latitude, longitude) VALUES (?, ?, ?)")
        .bind(&location.guid)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Plain insert of an airport, creating its country and location if needed.
pub(crate) async fn insert_airport(conn: &mut SqliteConnection, airport: &Airport) -> StoreResult<()> {
    if let Some(location) = &airport.location {
        ensure_location(conn, location).await?;
    }
    if let Some(country) = &airport.country {
        ensure_country(conn, country).await?;
    }
    sqlx::query(
        "INSERT INTO airports (guid, full_name, short_name, municipality_name, iata_code, location_id, country_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&airport.guid)
    .bind(&airport.full_name)
    .bind(&airport.short_name)
    .bind(&airport.municipality_name)
    .bind(&airport.iata_code)
    .bind(airport.location.as_ref().map(|l| l.guid.as_str()))
    .bind(airport.country.as_ref().map(|c| c.guid.as_str()))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn ensure_airport(conn: &mut SqliteConnection, airport: &Airport) -> StoreResult<()> {
    if exists(conn, "airports", &airport.guid).await? {
        return Ok(());
    }
    insert_airport(conn, airport).await
}

pub(crate) async fn insert_airline(conn: &mut SqliteConnection, airline: &Airline) -> StoreResult<()> {
    sqlx::query("INSERT INTO airlines (guid, icao_code, name, logo_path) VALUES (?, ?, ?, ?)")
        .bind(&airline.guid)
        .bind(&airline.icao_code)
        .bind(&airline.name)
        .bind(&airline.logo_path)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn ensure_airline(conn: &mut SqliteConnection, airline: &Airline) -> StoreResult<()> {
    if exists(conn, "airlines", &airline.guid).await? {
        return Ok(());
    }
    insert_airline(conn, airline).await
}

async fn insert_layover(conn: &mut SqliteConnection, flight_guid: &str, layover: &Layover) -> StoreResult<()> {
    ensure_airport(conn, &layover.airport).await?;
    sqlx::query("INSERT INTO layovers (guid, flight_id, airport_id, duration_minutes) VALUES (?, ?, ?, ?)")
        .bind(&layover.guid)
        .bind(flight_guid)
        .bind(&layover.airport.guid)
        .bind(layover.duration_minutes)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Plain insert of a flight with its airline, airports and layover, plus a
/// freshly generated seat configuration.
pub(crate) async fn insert_flight(conn: &mut SqliteConnection, flight: &Flight) -> StoreResult<()> {
    ensure_airline(conn, &flight.airline).await?;
    ensure_airport(conn, &flight.departure_airport).await?;
    ensure_airport(conn, &flight.arrival_airport).await?;

    sqlx::query(
        "INSERT INTO flights (guid, flight_time_minutes, departure_time, arrival_time, num_stops, \
         price_economy, price_business, baggage_allowance, airline_id, departure_airport_id, arrival_airport_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&flight.guid)
    .bind(flight.flight_time_minutes)
    .bind(&flight.departure_time)
    .bind(&flight.arrival_time)
    .bind(flight.num_stops)
    .bind(flight.price_economy)
    .bind(flight.price_business)
    .bind(&flight.baggage_allowance)
    .bind(&flight.airline.guid)
    .bind(&flight.departure_airport.guid)
    .bind(&flight.arrival_airport.guid)
    .execute(&mut *conn)
    .await?;

    if let Some(layover) = &flight.layover {
        insert_layover(conn, &flight.guid, layover).await?;
    }

    let seats = FlightSeats::generate(&flight.guid, &mut rand::thread_rng());
    inventory::insert(conn, &seats).await?;

    debug!(flight_id = %flight.guid, "Flight created");
    Ok(())
}

/// Inserts the flight unless a flight with the same GUID exists.
pub(crate) async fn ensure_flight(conn: &mut SqliteConnection, flight: &Flight) -> StoreResult<()> {
    if exists(conn, "flights", &flight.guid).await? {
        return Ok(());
    }
    insert_flight(conn, flight).await
}
