//! Row types and the loaders that assemble them into nested domain records.

use chrono::NaiveDate;
use roam_core::{
    Airline, Airport, Continent, Country, Flight, Layover, Location, Passenger, PopularDestination,
    Trip, User,
};
use sqlx::SqliteConnection;

use crate::error::{StoreError, StoreResult};

#[derive(sqlx::FromRow)]
struct ContinentRow {
    guid: String,
    code: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct CountryRow {
    guid: String,
    code: String,
    name: String,
    continent_id: Option<String>,
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    guid: String,
    latitude: f64,
    longitude: f64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AirportRow {
    guid: String,
    full_name: String,
    short_name: String,
    municipality_name: String,
    iata_code: Option<String>,
    location_id: Option<String>,
    country_id: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AirlineRow {
    guid: String,
    icao_code: Option<String>,
    name: String,
    logo_path: Option<String>,
}

impl From<AirlineRow> for Airline {
    fn from(row: AirlineRow) -> Self {
        Self {
            guid: row.guid,
            icao_code: row.icao_code,
            name: row.name,
            logo_path: row.logo_path,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LayoverRow {
    guid: String,
    airport_id: String,
    duration_minutes: i32,
}

#[derive(sqlx::FromRow)]
pub(crate) struct FlightRow {
    guid: String,
    flight_time_minutes: i32,
    departure_time: String,
    arrival_time: String,
    num_stops: Option<i32>,
    price_economy: f64,
    price_business: Option<f64>,
    baggage_allowance: String,
    airline_id: String,
    departure_airport_id: String,
    arrival_airport_id: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct TripRow {
    guid: String,
    name: String,
    is_round_trip: bool,
    departure_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    departing_flight_id: String,
    returning_flight_id: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct PassengerRow {
    guid: String,
    trip_id: String,
    name: String,
    age: Option<i32>,
    departing_seat_id: i32,
    returning_seat_id: Option<i32>,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        Self {
            guid: row.guid,
            trip_id: row.trip_id,
            name: row.name,
            age: row.age,
            departing_seat_id: row.departing_seat_id,
            returning_seat_id: row.returning_seat_id,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    guid: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    pub(crate) password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            guid: row.guid,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DestinationRow {
    guid: String,
    name: String,
    image_path: Option<String>,
}

impl From<DestinationRow> for PopularDestination {
    fn from(row: DestinationRow) -> Self {
        Self {
            guid: row.guid,
            name: row.name,
            image_path: row.image_path,
        }
    }
}

pub(crate) const AIRPORT_COLUMNS: &str =
    "a.guid, a.full_name, a.short_name, a.municipality_name, a.iata_code, a.location_id, a.country_id";

pub(crate) const FLIGHT_COLUMNS: &str = "f.guid, f.flight_time_minutes, f.departure_time, f.arrival_time, \
     f.num_stops, f.price_economy, f.price_business, f.baggage_allowance, f.airline_id, \
     f.departure_airport_id, f.arrival_airport_id";

pub(crate) const TRIP_COLUMNS: &str = "t.guid, t.name, t.is_round_trip, t.departure_date, t.return_date, \
     t.departing_flight_id, t.returning_flight_id";

pub(crate) const PASSENGER_COLUMNS: &str =
    "p.guid, p.trip_id, p.name, p.age, p.departing_seat_id, p.returning_seat_id";

// ============================================================================
// Reference data
// ============================================================================

async fn continent(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Continent>> {
    let row: Option<ContinentRow> =
        sqlx::query_as("SELECT guid, code, name FROM continents WHERE guid = ?")
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(|r| Continent {
        guid: r.guid,
        code: r.code,
        name: r.name,
    }))
}

async fn country(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Country>> {
    let row: Option<CountryRow> =
        sqlx::query_as("SELECT guid, code, name, continent_id FROM countries WHERE guid = ?")
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let continent = match &row.continent_id {
        Some(id) => continent(conn, id).await?,
        None => None,
    };

    Ok(Some(Country {
        guid: row.guid,
        code: row.code,
        name: row.name,
        continent,
    }))
}

async fn location(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Location>> {
    let row: Option<LocationRow> =
        sqlx::query_as("SELECT guid, latitude, longitude FROM locations WHERE guid = ?")
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(|r| Location {
        guid: r.guid,
        latitude: r.latitude,
        longitude: r.longitude,
    }))
}

pub(crate) async fn airport_from_row(conn: &mut SqliteConnection, row: AirportRow) -> StoreResult<Airport> {
    let location = match &row.location_id {
        Some(id) => location(conn, id).await?,
        None => None,
    };
    let country = match &row.country_id {
        Some(id) => country(conn, id).await?,
        None => None,
    };

    Ok(Airport {
        guid: row.guid,
        full_name: row.full_name,
        short_name: row.short_name,
        municipality_name: row.municipality_name,
        iata_code: row.iata_code,
        location,
        country,
    })
}

pub(crate) async fn airports_from_rows(
    conn: &mut SqliteConnection,
    rows: Vec<AirportRow>,
) -> StoreResult<Vec<Airport>> {
    let mut airports = Vec::with_capacity(rows.len());
    for row in rows {
        airports.push(airport_from_row(conn, row).await?);
    }
    Ok(airports)
}

pub(crate) async fn airport(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Airport>> {
    let row: Option<AirportRow> =
        sqlx::query_as(&format!("SELECT {AIRPORT_COLUMNS} FROM airports a WHERE a.guid = ?"))
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;

    match row {
        Some(row) => Ok(Some(airport_from_row(conn, row).await?)),
        None => Ok(None),
    }
}

async fn required_airport(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Airport> {
    airport(conn, guid)
        .await?
        .ok_or_else(|| StoreError::Missing(format!("Airport {guid}")))
}

pub(crate) async fn airline(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Airline>> {
    let row: Option<AirlineRow> =
        sqlx::query_as("SELECT guid, icao_code, name, logo_path FROM airlines WHERE guid = ?")
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Airline::from))
}

// ============================================================================
// Flights
// ============================================================================

async fn layover(conn: &mut SqliteConnection, flight_guid: &str) -> StoreResult<Option<Layover>> {
    let row: Option<LayoverRow> =
        sqlx::query_as("SELECT guid, airport_id, duration_minutes FROM layovers WHERE flight_id = ?")
            .bind(flight_guid)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(Layover {
        guid: row.guid,
        airport: required_airport(conn, &row.airport_id).await?,
        duration_minutes: row.duration_minutes,
    }))
}

pub(crate) async fn flight_from_row(conn: &mut SqliteConnection, row: FlightRow) -> StoreResult<Flight> {
    let airline = airline(conn, &row.airline_id)
        .await?
        .ok_or_else(|| StoreError::Missing(format!("Airline {}", row.airline_id)))?;
    let departure_airport = required_airport(conn, &row.departure_airport_id).await?;
    let arrival_airport = required_airport(conn, &row.arrival_airport_id).await?;
    let layover = layover(conn, &row.guid).await?;

    let seat_configuration_id: Option<(String,)> =
        sqlx::query_as("SELECT guid FROM flight_seats WHERE flight_id = ?")
            .bind(&row.guid)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(Flight {
        guid: row.guid,
        flight_time_minutes: row.flight_time_minutes,
        departure_time: row.departure_time,
        arrival_time: row.arrival_time,
        num_stops: row.num_stops,
        price_economy: row.price_economy,
        price_business: row.price_business,
        baggage_allowance: row.baggage_allowance,
        airline,
        departure_airport,
        arrival_airport,
        layover,
        seat_configuration_id: seat_configuration_id.map(|(id,)| id),
    })
}

pub(crate) async fn flights_from_rows(
    conn: &mut SqliteConnection,
    rows: Vec<FlightRow>,
) -> StoreResult<Vec<Flight>> {
    let mut flights = Vec::with_capacity(rows.len());
    for row in rows {
        flights.push(flight_from_row(conn, row).await?);
    }
    Ok(flights)
}

pub(crate) async fn flight(conn: &mut SqliteConnection, guid: &str) -> StoreResult<Option<Flight>> {
    let row: Option<FlightRow> =
        sqlx::query_as(&format!("SELECT {FLIGHT_COLUMNS} FROM flights f WHERE f.guid = ?"))
            .bind(guid)
            .fetch_optional(&mut *conn)
            .await?;

    match row {
        Some(row) => Ok(Some(flight_from_row(conn, row).await?)),
        None => Ok(None),
    }
}

// ============================================================================
// Trips
// ============================================================================

pub(crate) async fn passengers(conn: &mut SqliteConnection, trip_guid: &str) -> StoreResult<Vec<Passenger>> {
    let rows: Vec<PassengerRow> = sqlx::query_as(&format!(
        "SELECT {PASSENGER_COLUMNS} FROM passengers p WHERE p.trip_id = ? ORDER BY p.position"
    ))
    .bind(trip_guid)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Passenger::from).collect())
}

pub(crate) async fn trip_from_row(conn: &mut SqliteConnection, row: TripRow) -> StoreResult<Trip> {
    let departing_flight = flight(conn, &row.departing_flight_id)
        .await?
        .ok_or_else(|| StoreError::Missing(format!("Flight {}", row.departing_flight_id)))?;
    let returning_flight = match &row.returning_flight_id {
        Some(id) => flight(conn, id).await?,
        None => None,
    };
    let passengers = passengers(conn, &row.guid).await?;

    Ok(Trip {
        guid: row.guid,
        name: row.name,
        is_round_trip: row.is_round_trip,
        departure_date: row.departure_date,
        return_date: row.return_date,
        departing_flight,
        returning_flight,
        passengers,
    })
}

pub(crate) async fn trips_from_rows(conn: &mut SqliteConnection, rows: Vec<TripRow>) -> StoreResult<Vec<Trip>> {
    let mut trips = Vec::with_capacity(rows.len());
    for row in rows {
        trips.push(trip_from_row(conn, row).await?);
    }
    Ok(trips)
}

impl TripRow {
    pub(crate) fn departing_flight_id(&self) -> &str {
        &self.departing_flight_id
    }

    pub(crate) fn returning_flight_id(&self) -> Option<&str> {
        self.returning_flight_id.as_deref()
    }
}
