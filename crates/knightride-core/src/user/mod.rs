//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User profile as returned by the API (`User`, `RideStats`)

mod model;

// Re-export public API
pub use model::{RideStats, User};
