use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{new_guid, SeatId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Continent {
    pub guid: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub guid: String,
    pub code: String,
    pub name: String,
    pub continent: Option<Continent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub guid: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airport {
    pub guid: String,
    pub full_name: String,
    pub short_name: String,
    pub municipality_name: String,
    pub iata_code: Option<String>,
    pub location: Option<Location>,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airline {
    pub guid: String,
    pub icao_code: Option<String>,
    pub name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layover {
    pub guid: String,
    pub airport: Airport,
    pub duration_minutes: i32,
}

/// A scheduled flight. Times are local `HH:MM` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub guid: String,
    pub flight_time_minutes: i32,
    pub departure_time: String,
    pub arrival_time: String,
    pub num_stops: Option<i32>,
    pub price_economy: f64,
    pub price_business: Option<f64>,
    pub baggage_allowance: String,
    pub airline: Airline,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    pub layover: Option<Layover>,
    pub seat_configuration_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passenger {
    pub guid: String,
    pub trip_id: String,
    pub name: String,
    pub age: Option<i32>,
    pub departing_seat_id: SeatId,
    pub returning_seat_id: Option<SeatId>,
}

/// A booked itinerary. `passengers` are listed in ticket order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub guid: String,
    pub name: String,
    pub is_round_trip: bool,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub departing_flight: Flight,
    pub returning_flight: Option<Flight>,
    pub passengers: Vec<Passenger>,
}

impl Trip {
    /// Flights this trip occupies seats on, departing first.
    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        std::iter::once(&self.departing_flight).chain(self.returning_flight.as_ref())
    }
}

/// Public view of an account. The password hash stays in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub guid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularDestination {
    #[serde(default = "new_guid")]
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}
