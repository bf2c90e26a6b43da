pub mod accounts;
pub mod destinations;
pub mod error;
pub mod seats;
pub mod trips;

pub use accounts::AccountService;
pub use destinations::DestinationService;
pub use error::{ServiceError, ServiceResult};
pub use seats::SeatService;
pub use trips::TripService;
