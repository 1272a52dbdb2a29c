//! Nearby services and roadside assistance requests.

mod model;

pub use model::{NearbyService, NearbyServices, ServiceQuery, ServiceRequest, ServiceRequestReceipt};
