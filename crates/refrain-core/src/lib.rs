//! Refrain Core Library
//!
//! This crate provides the core functionality for Refrain, a personal
//! rotation of quotes, lyrics and affirmations.
//!
//! # Architecture
//!
//! - **Library**: the whole state (collections, history, cursor) as one value
//! - **Store**: owns a `Library` and rewrites the JSON file after every change
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! // Add a collection
//! store.add_collection_from_markdown("- Breathe in, breathe out", "calm", "Calm", "affirmations")?;
//!
//! // Serve lines
//! let next = store.next_line()?;
//! let any = store.random_line()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `library`: The document and the selection logic
//! - `models`: Collections and history entries
//! - `ingest`: Markdown to lines
//! - `seed`: The built-in collection
//! - `storage`: JSON persistence
//! - `config`: Application configuration

pub mod config;
pub mod ingest;
pub mod library;
pub mod models;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::{Config, DEFAULT_HISTORY_COUNT};
pub use ingest::DEFAULT_KIND;
pub use library::{Library, Progress};
pub use models::{Collection, CollectionMap, HistoryEntry, HistoryIndex};
pub use storage::{JsonPersistence, StorageError};
pub use store::Store;
