//! Durable token slot capability.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Fixed name of the durable slot holding the raw token string.
pub const TOKEN_SLOT_NAME: &str = "knight_ride_token";

/// Errors that can occur while touching durable token storage.
#[derive(Error, Debug)]
pub enum TokenSlotError {
    /// The backing storage does not exist in this environment.
    #[error("token storage unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the slot failed.
    #[error("token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single named persistent location for the session token.
///
/// Implementations store the raw token string verbatim. Callers treat every
/// error as "persistence unavailable" and keep working in memory.
pub trait TokenSlot: Send + Sync {
    /// Reads the stored token, `Ok(None)` when the slot is empty.
    fn read(&self) -> Result<Option<String>, TokenSlotError>;

    /// Overwrites the slot with the given token.
    fn write(&self, token: &str) -> Result<(), TokenSlotError>;

    /// Empties the slot. Removing an already empty slot succeeds.
    fn remove(&self) -> Result<(), TokenSlotError>;
}

/// Process-local slot, used in tests and when no durable storage exists.
#[derive(Debug, Default)]
pub struct MemoryTokenSlot {
    value: Mutex<Option<String>>,
}

impl MemoryTokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds a token, as if left by a previous run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
        }
    }

    /// Current raw content of the slot.
    pub fn peek(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenSlot for MemoryTokenSlot {
    fn read(&self) -> Result<Option<String>, TokenSlotError> {
        Ok(self.peek())
    }

    fn write(&self, token: &str) -> Result<(), TokenSlotError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenSlotError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
