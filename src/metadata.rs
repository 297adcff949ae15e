//! Ordered string metadata accumulated while following redirects.
//!
//! Every descriptor hop contributes key/value pairs; later hops overwrite
//! earlier ones. The map is ordered so debug output and serialized dumps are
//! stable across runs.

use std::collections::BTreeMap;

use serde::Serialize;

/// An ordered key/value metadata map with later-wins merge semantics.
///
/// # Examples
///
/// ```rust
/// use larc::metadata::Metadata;
///
/// let mut meta = Metadata::new();
/// meta.insert("tagset", "stts");
/// meta.insert("version", "1");
///
/// let mut newer = Metadata::new();
/// newer.insert("version", "2");
///
/// meta.merge_from(&newer);
/// assert_eq!(meta.get("tagset"), Some("stts"));
/// assert_eq!(meta.get("version"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a pair, returning the previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Merges every pair from `other` into `self`, overwriting same-named keys.
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Merges an iterator of pairs into `self`, overwriting same-named keys.
    pub fn merge_pairs<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.entries.insert(key.into(), value.into());
        }
    }

    /// Iterates over the pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no pairs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Self::new();
        meta.merge_pairs(iter);
        meta
    }
}

impl IntoIterator for Metadata {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
