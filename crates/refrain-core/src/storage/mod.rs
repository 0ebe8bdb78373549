//! Storage layer
//!
//! Handles persistence of the library document.
//!
//! The whole library lives in one human-readable JSON file that is rewritten
//! after every change. Loading is fallible and reports why; the `Store`
//! starts fresh only when the file is missing or malformed.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
