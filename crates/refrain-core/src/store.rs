//! Unified storage interface
//!
//! The `Store` owns the in-memory [`Library`] and keeps the library file in
//! step with it: every operation that changes the library writes it back
//! before returning.
//!
//! ## Opening
//!
//! A missing or malformed library file is not an error. The store logs why
//! and starts from an empty library, then inserts the built-in collection
//! (unless the configuration turns seeding off). A file that exists but
//! cannot be read is an error, and is left untouched.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! store.add_collection_from_markdown(text, "morning", "Morning", DEFAULT_KIND)?;
//!
//! if let Some(line) = store.next_line()? {
//!     println!("{}", line);
//! }
//! ```

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{info, warn};

use crate::config::Config;
use crate::library::{Library, Progress};
use crate::models::{Collection, HistoryEntry};
use crate::storage::{JsonPersistence, StorageError};

/// Unified storage interface for Refrain
pub struct Store {
    /// The library document
    library: Library,
    /// Library file persistence handler
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store with a specific configuration
    ///
    /// Falls back to an empty library when the file is missing or malformed.
    /// Seeds the built-in collection when `config.seed` is set.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(config.data_path());

        let library = match persistence.load() {
            Ok(Some(library)) => library,
            Ok(None) => {
                info!("No library at {:?}, starting fresh", persistence.path());
                Library::new()
            }
            Err(e @ StorageError::InvalidFormat { .. }) => {
                warn!("Ignoring malformed library, starting fresh: {}", e);
                Library::new()
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to load library from {:?}", persistence.path())
                });
            }
        };

        let mut store = Self {
            library,
            persistence,
            config,
        };

        if store.config.seed {
            store.ensure_seed()?;
        }

        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the library document
    pub fn library(&self) -> &Library {
        &self.library
    }

    // ==================== Collections ====================

    /// Insert the built-in collection if it is missing, and persist
    ///
    /// Returns `true` if the collection was inserted. A second call is a
    /// no-op and does not write the file.
    pub fn ensure_seed(&mut self) -> Result<bool> {
        if !self.library.ensure_seed() {
            return Ok(false);
        }
        info!("Inserted built-in collection");
        self.save()?;
        Ok(true)
    }

    /// Create or replace a collection from markdown text, and persist
    ///
    /// Returns the number of lines kept.
    pub fn add_collection_from_markdown(
        &mut self,
        text: &str,
        key: &str,
        title: &str,
        kind: &str,
    ) -> Result<usize> {
        let replacing = self.library.collections().contains_key(key);
        let count = self.library.add_markdown_collection(text, key, title, kind);

        if replacing {
            info!("Replaced collection '{}' ({} lines)", key, count);
        } else {
            info!("Added collection '{}' ({} lines)", key, count);
        }

        self.save()?;
        Ok(count)
    }

    /// All collections in rotation order
    pub fn collections(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.library.collections().iter()
    }

    /// Get a collection by key
    pub fn get_collection(&self, key: &str) -> Option<&Collection> {
        self.library.collections().get(key)
    }

    /// Number of collections
    pub fn collection_count(&self) -> usize {
        self.library.collections().len()
    }

    // ==================== Selection ====================

    /// Serve the next line in sequence
    ///
    /// Returns `Ok(None)` when there is nothing to serve; nothing is written
    /// in that case.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let line = self.library.next_line();
        if line.is_some() {
            self.save()?;
        }
        Ok(line)
    }

    /// Serve a random line using the thread-local RNG
    pub fn random_line(&mut self) -> Result<Option<String>> {
        self.random_line_with(&mut rand::thread_rng())
    }

    /// Serve a random line using the given RNG
    pub fn random_line_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<String>> {
        let line = self.library.random_line(rng);
        if line.is_some() {
            self.save()?;
        }
        Ok(line)
    }

    // ==================== History ====================

    /// The last `n` served lines, oldest first
    pub fn recent_history(&self, n: usize) -> &[HistoryEntry] {
        self.library.recent_history(n)
    }

    /// Full history length
    pub fn history_len(&self) -> usize {
        self.library.history().len()
    }

    /// Progress through the current collection
    pub fn progress(&self) -> Option<Progress> {
        self.library.progress()
    }

    // ==================== Persistence ====================

    /// Write the library to disk
    pub fn save(&self) -> Result<()> {
        self.persistence
            .save(&self.library)
            .with_context(|| format!("Failed to save library to {:?}", self.persistence.path()))
    }
}
