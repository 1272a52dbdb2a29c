//! Atomic TOML file operations.
//!
//! Provides a thin layer for safe concurrent access to TOML configuration files.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::atomic_file::write_atomically;
use knightride_core::KnightRideError;

/// Errors that can occur during atomic TOML operations.
#[derive(Error, Debug)]
pub enum AtomicTomlError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
    /// File locking error.
    #[error("Lock error: {0}")]
    LockError(String),
}

impl From<AtomicTomlError> for KnightRideError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::IoError(e) => e.into(),
            AtomicTomlError::TomlError(e) => e.into(),
            AtomicTomlError::TomlSerError(e) => e.into(),
            AtomicTomlError::LockError(message) => KnightRideError::io(message),
        }
    }
}

/// A handle to a TOML file that is only ever replaced atomically.
///
/// Provides:
/// - **Atomicity**: Writes go through tmp file + rename
/// - **Consistency**: TOML schema validation on load/save
/// - **Isolation**: File locking serializes read-modify-write updates
/// - **Durability**: Explicit fsync before rename
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and replaces the file with it.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let toml_string = toml::to_string_pretty(data)?;
        write_atomically(&self.path, toml_string.as_bytes(), None)?;
        Ok(())
    }

    /// Performs a locked read-modify-write.
    ///
    /// `default_value` is used when the file does not exist yet. The updated
    /// value is written back only if `f` returns `Ok(())`.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;

        Ok(())
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock next to the given path.
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicTomlError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}
