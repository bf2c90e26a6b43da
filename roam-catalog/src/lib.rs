pub mod seating;
pub mod destinations;

pub use seating::{
    BookOutcome, CabinClass, DoubleBooking, FlightSeats, Seat, SeatError, SeatId, SeatPosition,
    BUSINESS_SEATS, TOTAL_SEATS,
};
pub use destinations::sample_popular;
