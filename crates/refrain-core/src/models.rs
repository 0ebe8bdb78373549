//! Data models for Refrain
//!
//! Defines the core data structures: Collection, HistoryEntry, and the
//! insertion-ordered CollectionMap that decides rotation order.
//! Field names match the on-disk JSON document.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named set of lines served one at a time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Display title
    pub title: String,
    /// Free-form kind tag ("song_lyrics", "affirmations", "poem", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Lines in serving order
    pub lines: Vec<String>,
    /// Short description shown in listings
    #[serde(default)]
    pub description: String,
}

impl Collection {
    /// Create a collection with an empty description
    pub fn new(title: impl Into<String>, kind: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            lines,
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the collection has no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Which line of a collection a history entry refers to
///
/// Stored as a plain integer for sequential reads and as the string
/// `"random"` for random picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryIndex {
    /// Sequential read at this position
    Position(usize),
    /// Random pick
    Random,
}

impl HistoryIndex {
    const RANDOM: &'static str = "random";
}

impl fmt::Display for HistoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryIndex::Position(n) => write!(f, "{}", n),
            HistoryIndex::Random => f.write_str(Self::RANDOM),
        }
    }
}

impl Serialize for HistoryIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HistoryIndex::Position(n) => serializer.serialize_u64(*n as u64),
            HistoryIndex::Random => serializer.serialize_str(Self::RANDOM),
        }
    }
}

impl<'de> Deserialize<'de> for HistoryIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = HistoryIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or the string \"random\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                usize::try_from(v)
                    .map(HistoryIndex::Position)
                    .map_err(|_| E::custom(format!("history index out of range: {}", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                if v < 0 {
                    return Err(E::custom(format!("negative history index: {}", v)));
                }
                self.visit_u64(v as u64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == HistoryIndex::RANDOM {
                    Ok(HistoryIndex::Random)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

/// One line that was shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Key of the collection the line came from
    pub collection: String,
    /// Title of that collection at the time
    pub title: String,
    /// The line itself
    pub line: String,
    /// Position read, or `Random`
    pub index: HistoryIndex,
}

/// Collections keyed by id, in insertion order
///
/// Insertion order is the rotation order for sequential reads. Replacing an
/// existing key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMap {
    entries: Vec<(String, Collection)>,
}

impl CollectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Collection> {
        self.position(key).map(|pos| &self.entries[pos].1)
    }

    /// Insert or replace a collection
    ///
    /// Returns the previous collection stored under `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, collection: Collection) -> Option<Collection> {
        let key = key.into();
        match self.position(&key) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, collection)),
            None => {
                self.entries.push((key, collection));
                None
            }
        }
    }

    /// Index of `key` in rotation order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Entry at a rotation position
    pub fn get_index(&self, index: usize) -> Option<(&str, &Collection)> {
        self.entries.get(index).map(|(k, c)| (k.as_str(), c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }
}

impl Serialize for CollectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, collection) in &self.entries {
            map.serialize_entry(key, collection)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CollectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = CollectionMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of collection id to collection")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CollectionMap::new();
                // Duplicate keys: last value wins, first position kept
                while let Some((key, collection)) = access.next_entry::<String, Collection>()? {
                    map.insert(key, collection);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

impl<K: Into<String>> FromIterator<(K, Collection)> for CollectionMap {
    fn from_iter<I: IntoIterator<Item = (K, Collection)>>(iter: I) -> Self {
        let mut map = CollectionMap::new();
        for (key, collection) in iter {
            map.insert(key, collection);
        }
        map
    }
}
