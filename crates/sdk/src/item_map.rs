//! Insertion-ordered map of menu entries keyed by item key.
//!
//! Menus are small (tens of entries) and their order is meaningful, so the
//! map is a plain vector with linear lookups. Keys are unique.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered `key → value` collection used for every menu surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> ItemMap<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Insert or replace an entry, keeping the original slot on replace.
    ///
    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert only when the key is absent. The existing entry always wins.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: T) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &T) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    /// Stable sort by a key derived from each entry.
    ///
    /// Entries with equal sort keys keep their insertion order.
    pub fn sort_by_key<K: Ord>(&mut self, mut f: impl FnMut(&str, &T) -> K) {
        self.entries.sort_by_key(|(k, v)| f(k, v));
    }

    /// Map every value, keeping keys and order.
    pub fn map_values<U>(self, mut f: impl FnMut(&str, T) -> U) -> ItemMap<U> {
        ItemMap {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| {
                    let mapped = f(&k, v);
                    (k, mapped)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<T> Default for ItemMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for ItemMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Later duplicates replace earlier values in place, like [`ItemMap::insert`].
impl<K: Into<String>, T> FromIterator<(K, T)> for ItemMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T: Serialize> Serialize for ItemMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ItemMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ItemMapVisitor<T> {
    type Value = ItemMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of menu item keys to entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ItemMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Deserialization keeps document order.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for ItemMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ItemMapVisitor(PhantomData))
    }
}
