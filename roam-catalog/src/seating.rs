use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seat numbers are plain integers shared by convention with passenger records.
pub type SeatId = i32;

/// Seats per aircraft.
pub const TOTAL_SEATS: SeatId = 188;

/// Seats `1..=BUSINESS_SEATS` are Business, the rest Economy.
pub const BUSINESS_SEATS: SeatId = 20;

const MIN_OCCUPANCY: f64 = 0.25;
const MAX_OCCUPANCY: f64 = 0.80;
const OCCUPY_PROBABILITY: f64 = 0.75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CabinClass {
    Business,
    Economy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatPosition {
    Window,
    Aisle,
    Middle,
}

/// One entry of a flight's seat configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub seat_id: SeatId,
    #[serde(rename = "type")]
    pub class: CabinClass,
    pub position: SeatPosition,
    pub available: bool,
}

impl Seat {
    /// Class and position are a pure function of the seat number.
    pub fn for_id(seat_id: SeatId) -> Self {
        let (class, position) = if seat_id <= BUSINESS_SEATS {
            let position = match seat_id % 4 {
                1 | 4 => SeatPosition::Window,
                _ => SeatPosition::Aisle,
            };
            (CabinClass::Business, position)
        } else {
            let position = match seat_id % 6 {
                1 | 6 => SeatPosition::Window,
                2 | 5 => SeatPosition::Aisle,
                _ => SeatPosition::Middle,
            };
            (CabinClass::Economy, position)
        };

        Self {
            seat_id,
            class,
            position,
            available: true,
        }
    }
}

/// What to do when a booking targets a seat that is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoubleBooking {
    /// Leave the seat booked and report `AlreadyBooked`.
    #[default]
    Allow,
    /// Fail with `SeatError::AlreadyTaken`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    Booked,
    AlreadyBooked,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Seat {0} not found in seat configuration")]
    NotFound(SeatId),

    #[error("Seat {0} is already booked")]
    AlreadyTaken(SeatId),
}

/// Seat configuration of a single flight.
///
/// `seats_available` is derived from `seat_configuration` and recomputed after
/// every mutation, so it never drifts from the map it describes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSeats {
    pub guid: String,
    pub flight_id: String,
    pub seats_available: i32,
    pub seat_configuration: Vec<Seat>,
}

impl FlightSeats {
    /// Fresh layout with every seat available.
    pub fn empty(flight_id: &str) -> Self {
        let seat_configuration: Vec<Seat> = (1..=TOTAL_SEATS).map(Seat::for_id).collect();
        let mut seats = Self {
            guid: Uuid::new_v4().to_string(),
            flight_id: flight_id.to_string(),
            seats_available: 0,
            seat_configuration,
        };
        seats.recount();
        seats
    }

    /// Layout plus a randomized occupancy pass.
    pub fn generate<R: Rng + ?Sized>(flight_id: &str, rng: &mut R) -> Self {
        let mut seats = Self::empty(flight_id);
        seats.simulate_occupancy(rng);
        seats
    }

    /// Marks a random share of the cabin as occupied, clustering Economy
    /// passengers next to each other.
    ///
    /// This is a single pass over the cabin, so the occupied count can fall
    /// short of the drawn target when the coin flips are unlucky.
    pub fn simulate_occupancy<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let total = self.seat_configuration.len();
        let share = rng.gen_range(MIN_OCCUPANCY..=MAX_OCCUPANCY);
        let mut remaining = (share * total as f64).round() as usize;

        let mut i = 0;
        while remaining > 0 && i < total {
            if self.seat_configuration[i].available && rng.gen_bool(OCCUPY_PROBABILITY) {
                self.seat_configuration[i].available = false;
                remaining -= 1;

                let seat = &self.seat_configuration[i];
                if remaining > 0 && seat.class == CabinClass::Economy {
                    let neighbours = match seat.position {
                        SeatPosition::Middle | SeatPosition::Aisle => [Some(i + 1), i.checked_sub(1)],
                        SeatPosition::Window => [Some(i + 1), None],
                    };
                    for j in neighbours.into_iter().flatten() {
                        if j < total && self.seat_configuration[j].available {
                            self.seat_configuration[j].available = false;
                            remaining -= 1;
                            if remaining == 0 {
                                break;
                            }
                        }
                    }
                }
            }
            i += 1;
        }

        self.recount();
    }

    pub fn seat(&self, seat_id: SeatId) -> Option<&Seat> {
        self.seat_configuration.iter().find(|s| s.seat_id == seat_id)
    }

    /// Marks `seat_id` as taken.
    pub fn book(&mut self, seat_id: SeatId, policy: DoubleBooking) -> Result<BookOutcome, SeatError> {
        let seat = self
            .seat_configuration
            .iter_mut()
            .find(|s| s.seat_id == seat_id)
            .ok_or(SeatError::NotFound(seat_id))?;

        if !seat.available {
            return match policy {
                DoubleBooking::Allow => Ok(BookOutcome::AlreadyBooked),
                DoubleBooking::Reject => Err(SeatError::AlreadyTaken(seat_id)),
            };
        }

        seat.available = false;
        self.recount();
        Ok(BookOutcome::Booked)
    }

    /// Returns `seat_id` to the pool. Releasing a free seat is a no-op.
    pub fn release(&mut self, seat_id: SeatId) -> Result<(), SeatError> {
        let seat = self
            .seat_configuration
            .iter_mut()
            .find(|s| s.seat_id == seat_id)
            .ok_or(SeatError::NotFound(seat_id))?;

        seat.available = true;
        self.recount();
        Ok(())
    }

    pub fn occupied(&self) -> usize {
        self.seat_configuration.iter().filter(|s| !s.available).count()
    }

    fn recount(&mut self) {
        self.seats_available = self.seat_configuration.iter().filter(|s| s.available).count() as i32;
    }
}
