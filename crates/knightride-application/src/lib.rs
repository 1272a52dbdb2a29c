//! Application layer for Knight Ride.
//!
//! Use cases that coordinate the domain state machine with the HTTP client:
//! signing in, managing emergency contacts and running the SOS countdown.

pub mod auth_service;
pub mod contact_book;
pub mod emergency_service;
pub mod location;
pub mod scheduler;

pub use auth_service::AuthService;
pub use contact_book::ContactBook;
pub use emergency_service::{EmergencyEvent, EmergencyService, FireReport};
pub use location::{FixedLocation, LocationProvider};
pub use scheduler::IntervalScheduler;
