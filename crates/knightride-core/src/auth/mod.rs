//! Authentication payloads exchanged with `/auth/*`.

mod model;

pub use model::{AuthResponse, Credentials, Registration};
