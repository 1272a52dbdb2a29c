//! Session domain module.
//!
//! Holds the bearer token that authenticates API calls and the durable slot
//! it survives restarts in.
//!
//! # Module Structure
//!
//! - `slot`: Durable storage capability (`TokenSlot`) and an in-memory implementation
//! - `store`: Token owner (`SessionStore`) with one-time hydration from its slot
//!
//! # Usage
//!
//! ```ignore
//! use knightride_core::session::{SessionStore, MemoryTokenSlot};
//! ```

mod slot;
mod store;

// Re-export public API
pub use slot::{MemoryTokenSlot, TOKEN_SLOT_NAME, TokenSlot, TokenSlotError};
pub use store::{SessionStore, SessionToken};
