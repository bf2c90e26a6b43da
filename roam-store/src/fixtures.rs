//! Sample records shared by the store tests.

use roam_core::{Airline, Airport, Continent, Country, Flight, Location};

pub fn airport(guid: &str, iata: &str, country_code: &str) -> Airport {
    Airport {
        guid: guid.to_string(),
        full_name: format!("{iata} International Airport"),
        short_name: iata.to_string(),
        municipality_name: format!("{iata} City"),
        iata_code: Some(iata.to_string()),
        location: Some(Location {
            guid: format!("loc-{guid}"),
            latitude: 38.77,
            longitude: -9.13,
        }),
        country: Some(Country {
            guid: format!("country-{country_code}"),
            code: country_code.to_string(),
            name: format!("Country {country_code}"),
            continent: Some(Continent {
                guid: "continent-eu".to_string(),
                code: "EU".to_string(),
                name: "Europe".to_string(),
            }),
        }),
    }
}

pub fn airline() -> Airline {
    Airline {
        guid: "al-roam".to_string(),
        icao_code: Some("RMA".to_string()),
        name: "Roam Air".to_string(),
        logo_path: Some("/logos/roam.png".to_string()),
    }
}

pub fn flight(guid: &str, from: Airport, to: Airport) -> Flight {
    Flight {
        guid: guid.to_string(),
        flight_time_minutes: 150,
        departure_time: "08:00".to_string(),
        arrival_time: "10:30".to_string(),
        num_stops: Some(0),
        price_economy: 89.99,
        price_business: Some(349.0),
        baggage_allowance: "23kg".to_string(),
        airline: airline(),
        departure_airport: from,
        arrival_airport: to,
        layover: None,
        seat_configuration_id: None,
    }
}

pub fn lisbon() -> Airport {
    airport("ap-lis", "LIS", "PT")
}

pub fn madrid() -> Airport {
    airport("ap-mad", "MAD", "ES")
}
