//! Domain layer of the Knight Ride client.
//!
//! Everything here is free of I/O: domain models, the response envelope, the
//! session token owner and the SOS trigger state machine. Storage and HTTP
//! live in the infrastructure and interaction crates behind the traits
//! defined here.

pub mod api;
pub mod auth;
pub mod config;
pub mod contact;
pub mod emergency;
pub mod error;
pub mod location;
pub mod roadside;
pub mod session;
pub mod user;

// Re-export common types
pub use api::{ApiError, ApiResult};
pub use error::KnightRideError;
pub use location::Location;
