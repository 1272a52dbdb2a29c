//! HTTP interaction layer for the Knight Ride API.
//!
//! [`ApiClient`] owns the transport; every operation returns an
//! [`ApiResult`](knightride_core::ApiResult) and never panics on server or
//! network failures.

pub mod api_client;
pub mod error;
pub mod request;

pub use api_client::{ApiClient, HealthStatus};
pub use error::{RequestError, http_error_message};
pub use request::RequestEnvelope;
