//! Play sequences from M3U playlists.
//!
//! Each non-comment line naming a known media file becomes one key; a key is
//! kept only at its first occurrence. The resulting order is what
//! [`crate::catalog::Catalog::ingest_play_sequence`] consumes.

use crate::item::ItemKey;
use crate::keys::KeyRegistry;
use anyhow::{Context, Result};
use log::{debug, trace};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Ordered, duplicate-free sequence of item keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    keys: Vec<ItemKey>,
}

impl Playlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse M3U text. Lines must end in one of `extensions` and be known to
    /// `registry`; everything else is skipped.
    pub fn parse(text: &str, registry: &KeyRegistry, extensions: &[String]) -> Self {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || !has_media_suffix(line, extensions) {
                continue;
            }
            let filename = line.replace('\\', "/");
            match registry.get(&filename) {
                Some(key) if seen.insert(key.clone()) => keys.push(key.clone()),
                Some(_) => trace!("Dropping repeated entry {filename}"),
                None => trace!("Dropping unknown entry {filename}"),
            }
        }

        Self { keys }
    }

    /// Load an `.m3u` file. Any other extension yields an empty playlist.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read.
    pub fn load(path: &Path, registry: &KeyRegistry, extensions: &[String]) -> Result<Self> {
        let is_m3u = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("m3u"));
        if !is_m3u {
            debug!("Ignoring non-M3U playlist {}", path.display());
            return Ok(Self::new());
        }

        let bytes = fs::read(path).with_context(|| format!("Failed to read playlist {}", path.display()))?;
        let playlist = Self::parse(&String::from_utf8_lossy(&bytes), registry, extensions);
        debug!("Loaded {} entries from {}", playlist.len(), path.display());
        Ok(playlist)
    }

    pub fn push_back(&mut self, key: ItemKey) {
        self.keys.push(key);
    }

    pub fn pop_front(&mut self) -> Option<ItemKey> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys.remove(0))
        }
    }

    pub fn pop_back(&mut self) -> Option<ItemKey> {
        self.keys.pop()
    }

    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemKey> + '_ {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys.iter().map(ItemKey::as_str).collect();
        write!(f, "[{}]", keys.join(", "))
    }
}

fn has_media_suffix(line: &str, extensions: &[String]) -> bool {
    Path::new(line)
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_with(files: &[&str]) -> KeyRegistry {
        let mut registry = KeyRegistry::new();
        for file in files {
            registry.generate(file);
        }
        registry
    }

    fn mp3() -> Vec<String> {
        vec!["mp3".to_string()]
    }

    #[test]
    fn test_parse_skips_comments_unknowns_and_repeats() {
        let registry = registry_with(&["a.mp3", "dir/b.mp3"]);
        let text = "#EXTM3U\n#EXTINF:123,Artist - Title\na.mp3\n\nunknown.mp3\ncover.jpg\n  dir/b.mp3  \na.mp3\n";

        let playlist = Playlist::parse(text, &registry, &mp3());

        let expected = vec![
            registry.get("a.mp3").unwrap().clone(),
            registry.get("dir/b.mp3").unwrap().clone(),
        ];
        assert_eq!(playlist.keys(), expected.as_slice());
    }

    #[test]
    fn test_load_requires_m3u_extension() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(&["a.mp3"]);
        let path = dir.path().join("list.txt");
        fs::write(&path, "a.mp3\n").unwrap();

        let playlist = Playlist::load(&path, &registry, &mp3()).unwrap();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(&["a.mp3", "b.mp3"]);
        let path = dir.path().join("session.M3U");
        fs::write(&path, "b.mp3\r\na.mp3\r\n").unwrap();

        let playlist = Playlist::load(&path, &registry, &mp3()).unwrap();
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.keys()[0], *registry.get("b.mp3").unwrap());
    }

    #[test]
    fn test_load_missing_m3u_fails() {
        let dir = TempDir::new().unwrap();
        let registry = KeyRegistry::new();
        assert!(Playlist::load(&dir.path().join("none.m3u"), &registry, &mp3()).is_err());
    }

    #[test]
    fn test_queue_operations() {
        let mut playlist = Playlist::new();
        playlist.push_back(ItemKey::from("a"));
        playlist.push_back(ItemKey::from("b"));
        playlist.push_back(ItemKey::from("c"));

        assert_eq!(playlist.to_string(), "[a, b, c]");
        assert_eq!(playlist.pop_front(), Some(ItemKey::from("a")));
        assert_eq!(playlist.pop_back(), Some(ItemKey::from("c")));
        assert_eq!(playlist.iter().count(), 1);
        assert_eq!(playlist.pop_back(), Some(ItemKey::from("b")));
        assert_eq!(playlist.pop_front(), None);
    }
}
