//! Deterministic item keys.
//!
//! A key is the UUID v5 (URL namespace) of the root-relative filename, so
//! scanning the same file again reproduces the same key.

use crate::item::ItemKey;
use log::warn;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Key derived from `filename` alone.
#[must_use]
pub fn key_for_filename(filename: &str) -> ItemKey {
    ItemKey::new(Uuid::new_v5(&Uuid::NAMESPACE_URL, filename.as_bytes()).to_string())
}

/// Filename to key mapping with collision detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRegistry {
    by_file: BTreeMap<String, ItemKey>,
    owners: HashMap<ItemKey, String>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for `filename`, creating it on first sight.
    ///
    /// Returns `None` when the derived key already belongs to a different
    /// file; that file is then left out of the catalog.
    pub fn generate(&mut self, filename: &str) -> Option<ItemKey> {
        if let Some(key) = self.by_file.get(filename) {
            return Some(key.clone());
        }

        let key = key_for_filename(filename);
        if let Some(owner) = self.owners.get(&key) {
            warn!("Key collision: {key} already used by {owner}; ignoring {filename}");
            return None;
        }

        self.by_file.insert(filename.to_string(), key.clone());
        self.owners.insert(key.clone(), filename.to_string());
        Some(key)
    }

    pub fn get(&self, filename: &str) -> Option<&ItemKey> {
        self.by_file.get(filename)
    }

    pub fn filename(&self, key: &ItemKey) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    /// Forget `key`. Returns the filename it belonged to.
    pub fn remove(&mut self, key: &ItemKey) -> Option<String> {
        let filename = self.owners.remove(key)?;
        self.by_file.remove(&filename);
        Some(filename)
    }

    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    /// `(filename, key)` pairs ordered by filename.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemKey)> + '_ {
        self.by_file.iter().map(|(file, key)| (file.as_str(), key))
    }
}
