//! Storage layer for atomic file operations.

mod atomic_file;
mod atomic_toml;
mod token_file;

pub use atomic_file::write_atomically;
pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use token_file::FileTokenSlot;
