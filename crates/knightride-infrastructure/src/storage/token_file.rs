//! File-backed durable token slot.

use std::fs;
use std::path::{Path, PathBuf};

use knightride_core::session::{TokenSlot, TokenSlotError};

use super::atomic_file::write_atomically;
use crate::paths::{KnightRidePaths, PathError};

/// Durable token slot stored as a single plaintext file.
///
/// Responsibilities:
/// - Hold the raw token string, nothing else
/// - Write atomically with user-only permissions
/// - Treat a missing file as an empty slot
pub struct FileTokenSlot {
    path: PathBuf,
}

impl FileTokenSlot {
    /// Creates a slot at the default location (`<config_dir>/knight_ride_token`).
    pub fn from_paths(paths: &KnightRidePaths) -> Result<Self, PathError> {
        Ok(Self {
            path: paths.token_file()?,
        })
    }

    /// Creates a slot at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenSlot for FileTokenSlot {
    fn read(&self) -> Result<Option<String>, TokenSlotError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, token: &str) -> Result<(), TokenSlotError> {
        write_atomically(&self.path, token.as_bytes(), Some(0o600))?;
        tracing::debug!(path = %self.path.display(), "Session token persisted");
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenSlotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
