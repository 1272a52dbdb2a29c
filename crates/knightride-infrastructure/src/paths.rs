//! Unified path management for Knight Ride configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/knight-ride/         # Config directory (platform config dir)
//! ├── config.toml                # Client configuration
//! └── knight_ride_token          # Durable session token slot
//! ```

use std::path::{Path, PathBuf};

use knightride_core::session::TOKEN_SLOT_NAME;
use thiserror::Error;

/// Name of the application directory under the platform config dir.
pub const APP_DIR_NAME: &str = "knight-ride";

/// Errors that can occur during path resolution.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Resolves every file the client stores locally.
///
/// With a base path, all files live directly under it (used by tests and the
/// `--config-dir` flag). Without one, the platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct KnightRidePaths {
    base_path: Option<PathBuf>,
}

impl KnightRidePaths {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base_path: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the Knight Ride configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_path {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the durable token slot.
    ///
    /// # Security Note
    ///
    /// The file holds a live bearer credential and is written with mode 600
    /// on Unix.
    pub fn token_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(TOKEN_SLOT_NAME))
    }
}
