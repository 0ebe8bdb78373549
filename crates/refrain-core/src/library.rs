//! The library document
//!
//! `Library` is the whole persisted state: collections, the history log and
//! the sequential cursor. All selection logic lives here as plain methods so
//! it can be exercised without touching the filesystem; [`crate::Store`]
//! adds persistence on top.
//!
//! ## Sequential rotation
//!
//! The cursor points at `(current_collection, current_index)`. A read first
//! checks whether the index has run off the end of the collection and, if so,
//! rotates to the next collection in insertion order (wrapping after the
//! last) with the index reset to 0. Only then is the line read. The first
//! read after a collection is exhausted therefore comes from the next
//! collection.
//!
//! ## Random picks
//!
//! A random read picks a collection uniformly by key, then a line uniformly
//! within it. Small collections are as likely to be chosen as large ones.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest;
use crate::models::{Collection, CollectionMap, HistoryEntry, HistoryIndex};
use crate::seed;

/// Persisted state: collections, history, and the sequential cursor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Library {
    #[serde(default)]
    collections: CollectionMap,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    current_collection: Option<String>,
    #[serde(default)]
    current_index: usize,
}

/// Where the cursor stands in the current collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Key of the current collection
    pub key: String,
    /// Title of the current collection
    pub title: String,
    /// Lines already served from it
    pub position: usize,
    /// Total lines in it
    pub total: usize,
    /// Line the next sequential read will return, if the collection isn't finished
    pub next_line: Option<String>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections(&self) -> &CollectionMap {
        &self.collections
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_collection(&self) -> Option<&str> {
        self.current_collection.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The last `n` history entries, oldest first
    pub fn recent_history(&self, n: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    // ==================== Collections ====================

    /// Insert a collection, replacing any existing one under the same key
    ///
    /// A replaced collection keeps its place in the rotation order. The
    /// cursor is left alone.
    pub fn put_collection(
        &mut self,
        key: impl Into<String>,
        collection: Collection,
    ) -> Option<Collection> {
        self.collections.insert(key, collection)
    }

    /// Build a collection from markdown text and store it under `key`
    ///
    /// Returns the number of lines that survived parsing.
    pub fn add_markdown_collection(
        &mut self,
        text: &str,
        key: impl Into<String>,
        title: impl Into<String>,
        kind: impl Into<String>,
    ) -> usize {
        let kind = kind.into();
        let lines = ingest::parse_markdown(text);
        let count = lines.len();
        let collection = Collection::new(title, kind.clone(), lines)
            .with_description(ingest::markdown_description(&kind));
        self.put_collection(key, collection);
        count
    }

    /// Insert the built-in collection if its key is missing
    ///
    /// Returns `true` when the library changed.
    pub fn ensure_seed(&mut self) -> bool {
        if self.collections.contains_key(seed::SEED_KEY) {
            return false;
        }
        self.put_collection(seed::SEED_KEY, seed::seed_collection());
        true
    }

    // ==================== Selection ====================

    /// Serve the next line in sequence and advance the cursor
    ///
    /// Returns `None` without changing anything when no collection has a
    /// line to give.
    pub fn next_line(&mut self) -> Option<String> {
        let len = self.collections.len();
        if len == 0 {
            return None;
        }

        // An unset cursor (or one naming a vanished collection) starts over
        let (mut pos, mut index) = match self
            .current_collection
            .as_deref()
            .and_then(|key| self.collections.position(key))
        {
            Some(pos) => (pos, self.current_index),
            None => (0, 0),
        };

        // Rotate past exhausted collections; empty ones are skipped, once around at most
        let mut rotations = 0;
        while index >= self.collections.get_index(pos)?.1.len() {
            if rotations == len {
                return None;
            }
            pos = (pos + 1) % len;
            index = 0;
            rotations += 1;
        }

        let (key, collection) = self.collections.get_index(pos)?;
        if rotations > 0 {
            debug!("Rotated to collection '{}'", key);
        }

        let line = collection.lines[index].clone();
        let entry = HistoryEntry {
            collection: key.to_string(),
            title: collection.title.clone(),
            line: line.clone(),
            index: HistoryIndex::Position(index),
        };

        self.current_collection = Some(entry.collection.clone());
        self.current_index = index + 1;
        self.history.push(entry);

        Some(line)
    }

    /// Serve a random line without moving the cursor
    ///
    /// The collection is chosen uniformly among those that have lines, then
    /// a line uniformly within it.
    pub fn random_line<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        let candidates: Vec<(&str, &Collection)> = self
            .collections
            .iter()
            .filter(|(_, collection)| !collection.is_empty())
            .collect();

        let (key, collection) = candidates.choose(rng)?;
        let line = collection.lines.choose(rng)?.clone();

        let entry = HistoryEntry {
            collection: key.to_string(),
            title: collection.title.clone(),
            line: line.clone(),
            index: HistoryIndex::Random,
        };
        self.history.push(entry);

        Some(line)
    }

    /// Progress through the current collection
    ///
    /// `None` when no collection is selected yet.
    pub fn progress(&self) -> Option<Progress> {
        let key = self.current_collection.as_deref()?;
        let collection = self.collections.get(key)?;

        Some(Progress {
            key: key.to_string(),
            title: collection.title.clone(),
            position: self.current_index,
            total: collection.len(),
            next_line: collection.lines.get(self.current_index).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lines(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{} line number {}", prefix, i)).collect()
    }

    fn library_with(sizes: &[(&str, usize)]) -> Library {
        let mut library = Library::new();
        for (key, size) in sizes {
            library.put_collection(*key, Collection::new(key.to_uppercase(), "poem", lines(key, *size)));
        }
        library
    }

    #[test]
    fn test_empty_library_yields_nothing() {
        let mut library = Library::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(library.next_line().is_none());
        assert!(library.random_line(&mut rng).is_none());
        assert!(library.history().is_empty());
        assert!(library.current_collection().is_none());
        assert_eq!(library.current_index(), 0);
    }

    #[test]
    fn test_first_read_selects_first_collection() {
        let mut library = library_with(&[("one", 2), ("two", 2)]);

        assert_eq!(library.next_line().unwrap(), "one line number 0");
        assert_eq!(library.current_collection(), Some("one"));
        assert_eq!(library.current_index(), 1);
    }

    #[test]
    fn test_sequential_exhaustion_moves_to_next_collection() {
        let mut library = library_with(&[("one", 3), ("two", 2)]);

        let served: Vec<_> = (0..3).map(|_| library.next_line().unwrap()).collect();
        assert_eq!(served, lines("one", 3));

        // Index now equals the length until the next read rotates
        assert_eq!(library.current_collection(), Some("one"));
        assert_eq!(library.current_index(), 3);

        assert_eq!(library.next_line().unwrap(), "two line number 0");
        assert_eq!(library.current_collection(), Some("two"));
        assert_eq!(library.current_index(), 1);
    }

    #[test]
    fn test_last_collection_wraps_to_first() {
        let mut library = library_with(&[("one", 1), ("two", 1)]);

        assert_eq!(library.next_line().unwrap(), "one line number 0");
        assert_eq!(library.next_line().unwrap(), "two line number 0");
        assert_eq!(library.next_line().unwrap(), "one line number 0");
    }

    #[test]
    fn test_single_collection_wraps_to_itself() {
        let mut library = library_with(&[("solo", 2)]);

        library.next_line();
        library.next_line();
        assert_eq!(library.next_line().unwrap(), "solo line number 0");
        assert_eq!(library.current_index(), 1);
    }

    #[test]
    fn test_history_records_sequential_positions() {
        let mut library = library_with(&[("one", 2), ("two", 1)]);
        for _ in 0..3 {
            library.next_line();
        }

        let indexes: Vec<_> = library.history().iter().map(|e| e.index).collect();
        assert_eq!(
            indexes,
            vec![
                HistoryIndex::Position(0),
                HistoryIndex::Position(1),
                HistoryIndex::Position(0)
            ]
        );
        assert_eq!(library.history()[2].collection, "two");
        assert_eq!(library.history()[2].title, "TWO");
    }

    #[test]
    fn test_empty_collections_are_skipped() {
        let mut library = library_with(&[("one", 1), ("hollow", 0), ("three", 1)]);

        assert_eq!(library.next_line().unwrap(), "one line number 0");
        assert_eq!(library.next_line().unwrap(), "three line number 0");
        assert_eq!(library.next_line().unwrap(), "one line number 0");
    }

    #[test]
    fn test_all_empty_collections_yield_nothing() {
        let mut library = library_with(&[("hollow", 0), ("void", 0)]);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(library.next_line().is_none());
        assert!(library.random_line(&mut rng).is_none());
        assert!(library.history().is_empty());
        assert!(library.current_collection().is_none());
    }

    #[test]
    fn test_cursor_on_missing_collection_restarts() {
        let mut library = library_with(&[("one", 2)]);
        library.current_collection = Some("gone".to_string());
        library.current_index = 5;

        assert_eq!(library.next_line().unwrap(), "one line number 0");
        assert_eq!(library.current_collection(), Some("one"));
    }

    #[test]
    fn test_replacement_with_shorter_collection_rotates() {
        let mut library = library_with(&[("one", 3), ("two", 1)]);
        library.next_line();
        library.next_line();

        library.put_collection("one", Collection::new("ONE", "poem", lines("one", 1)));
        assert_eq!(library.next_line().unwrap(), "two line number 0");
    }

    #[test]
    fn test_random_does_not_touch_cursor() {
        let mut library = library_with(&[("one", 3), ("two", 3)]);
        let mut rng = StdRng::seed_from_u64(7);
        library.next_line();

        for _ in 0..10 {
            let line = library.random_line(&mut rng).unwrap();
            assert!(line.contains("line number"));
        }

        assert_eq!(library.current_collection(), Some("one"));
        assert_eq!(library.current_index(), 1);
        assert!(library.history()[1..]
            .iter()
            .all(|e| e.index == HistoryIndex::Random));
    }

    #[test]
    fn test_random_is_uniform_over_collections() {
        let mut library = library_with(&[("tiny", 1), ("huge", 99)]);
        let mut rng = StdRng::seed_from_u64(42);

        let trials = 10_000;
        for _ in 0..trials {
            library.random_line(&mut rng).unwrap();
        }

        let tiny = library
            .history()
            .iter()
            .filter(|e| e.collection == "tiny")
            .count();
        // Line-weighted selection would put this near 1%
        let share = tiny as f64 / trials as f64;
        assert!((0.45..0.55).contains(&share), "tiny share was {}", share);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut library = library_with(&[("one", 2), ("two", 2)]);
        let mut rng = StdRng::seed_from_u64(9);
        library.next_line();
        let before = library.history().to_vec();

        for i in 0..6 {
            if i % 2 == 0 {
                library.next_line();
            } else {
                library.random_line(&mut rng);
            }
        }

        assert_eq!(library.history().len(), before.len() + 6);
        assert_eq!(&library.history()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_recent_history() {
        let mut library = library_with(&[("one", 5)]);
        for _ in 0..5 {
            library.next_line();
        }

        let recent = library.recent_history(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].index, HistoryIndex::Position(3));
        assert_eq!(recent[1].index, HistoryIndex::Position(4));

        assert_eq!(library.recent_history(50).len(), 5);
        assert!(library.recent_history(0).is_empty());
    }

    #[test]
    fn test_progress() {
        let mut library = library_with(&[("one", 2)]);
        assert!(library.progress().is_none());

        library.next_line();
        let progress = library.progress().unwrap();
        assert_eq!(progress.title, "ONE");
        assert_eq!(progress.position, 1);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.next_line.as_deref(), Some("one line number 1"));

        library.next_line();
        let progress = library.progress().unwrap();
        assert!(progress.next_line.is_none());
        assert_eq!(progress.position, 2);
    }

    #[test]
    fn test_ensure_seed_is_idempotent() {
        let mut library = Library::new();

        assert!(library.ensure_seed());
        let once = library.clone();
        assert!(!library.ensure_seed());

        assert_eq!(library, once);
        assert_eq!(library.collections().len(), 1);
        assert_eq!(
            library.collections().get(seed::SEED_KEY).unwrap(),
            &seed::seed_collection()
        );
    }

    #[test]
    fn test_ensure_seed_keeps_user_edits() {
        let mut library = Library::new();
        library.put_collection(seed::SEED_KEY, Collection::new("Mine", "poem", vec![]));

        assert!(!library.ensure_seed());
        assert_eq!(library.collections().get(seed::SEED_KEY).unwrap().title, "Mine");
    }

    #[test]
    fn test_add_markdown_collection() {
        let mut library = Library::new();
        let count = library.add_markdown_collection(
            "# Morning\n- I am ready for today\n- ok",
            "morning",
            "Morning Words",
            "affirmations",
        );

        assert_eq!(count, 1);
        let collection = library.collections().get("morning").unwrap();
        assert_eq!(collection.lines, vec!["I am ready for today"]);
        assert_eq!(collection.description, "Added via markdown - affirmations");
        assert_eq!(collection.kind, "affirmations");
    }

    #[test]
    fn test_document_layout() {
        let mut library = library_with(&[("one", 1)]);
        library.next_line();

        let value = serde_json::to_value(&library).unwrap();
        assert_eq!(value["current_collection"], "one");
        assert_eq!(value["current_index"], 1);
        assert!(value["collections"]["one"]["lines"].is_array());
        assert_eq!(value["history"][0]["index"], 0);
    }

    #[test]
    fn test_fresh_document_layout() {
        let value = serde_json::to_value(Library::new()).unwrap();
        assert!(value["current_collection"].is_null());
        assert_eq!(value["current_index"], 0);
        assert_eq!(value["collections"], serde_json::json!({}));
        assert_eq!(value["history"], serde_json::json!([]));
    }
}
