//! Emergency contact domain module.
//!
//! Contacts are addressed by position on the wire (`DELETE /contacts/{index}`).
//! Any mutation shifts the indices of later entries, so callers must re-fetch
//! the list before issuing another positional delete.

mod model;

pub use model::{ContactAdded, ContactDeleted, ContactList, ContactRef, EmergencyContact};
