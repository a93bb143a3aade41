//! # Catalog
//!
//! Owns the [`RelationGraph`] plus a per-item metadata table, and answers the
//! rank, distance and neighbor queries the recommender is built on.
//!
//! Items enter in two steps. [`Catalog::add_item`] registers a filename and its
//! resolved path; [`Catalog::load_metadata`] later fills in the tag fields.
//! Until that second step succeeds the item is *incomplete*: only its filename
//! and path are visible. A tag read failure leaves the item registered and
//! marks it [`MetadataState::Failed`].
//!
//! Play history arrives as ordered key sequences through
//! [`Catalog::ingest_play_sequence`], each consecutive pair bumping one edge.
//!
//! Queries never fail on unknown keys: rank is 0, distance is `(0, 0)` and
//! attribute getters return `None`.
//!
//! The catalog has no interior locking. Share it across threads as a
//! [`SharedCatalog`] and take the write lock for every mutation.

use crate::error::{CatalogError, CatalogResult};
use crate::graph::RelationGraph;
use crate::item::{ItemKey, ItemRecord, MediaTags};
use crate::tags::TagReader;
use log::{debug, info, warn};
use path_absolutize::Absolutize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Catalog behind a reader-writer lock: queries share, mutations exclude.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// Tag extraction progress of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    /// Registered, tags not read yet
    Pending,
    /// Tags read and applied
    Loaded,
    /// Tag read failed; only filename and path are available
    Failed(String),
}

/// Bootstrap fields recorded by [`Catalog::add_item`].
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub filename: String,
    pub path: PathBuf,
    pub state: MetadataState,
}

/// Text attributes usable with [`Catalog::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Artist,
    Album,
    Composer,
    Genre,
    Date,
    Comment,
    Filename,
}

impl TextField {
    fn read(self, record: &ItemRecord) -> &str {
        match self {
            TextField::Title => record.title(),
            TextField::Artist => record.artist(),
            TextField::Album => record.album(),
            TextField::Composer => record.composer(),
            TextField::Genre => record.genre(),
            TextField::Date => record.date(),
            TextField::Comment => record.comment(),
            TextField::Filename => record.filename(),
        }
    }
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(TextField::Title),
            "artist" => Ok(TextField::Artist),
            "album" => Ok(TextField::Album),
            "composer" => Ok(TextField::Composer),
            "genre" => Ok(TextField::Genre),
            "date" => Ok(TextField::Date),
            "comment" => Ok(TextField::Comment),
            "filename" => Ok(TextField::Filename),
            other => Err(format!("Unknown field: {other}")),
        }
    }
}

/// Media items, their metadata and their play-history graph.
#[derive(Debug, Clone)]
pub struct Catalog {
    root_dir: PathBuf,
    graph: RelationGraph,
    entries: HashMap<ItemKey, CatalogEntry>,
    by_filename: HashMap<String, ItemKey>,
}

impl Catalog {
    /// Empty catalog resolving filenames against `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            graph: RelationGraph::new(),
            entries: HashMap::new(),
            by_filename: HashMap::new(),
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Read-only view of the relationship graph.
    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    /// Register `filename` under `key`.
    ///
    /// Returns `Ok(false)` without changes when the filename (or the key) is
    /// already tracked; the first registration wins.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Record`] for an empty filename, [`CatalogError::Path`]
    /// when the absolute path cannot be resolved.
    pub fn add_item(&mut self, key: ItemKey, filename: &str) -> CatalogResult<bool> {
        if let Some(owner) = self.by_filename.get(filename) {
            debug!("Skipping {filename}: already tracked as {owner}");
            return Ok(false);
        }
        if self.entries.contains_key(&key) {
            warn!("Skipping {filename}: key {key} already names another file");
            return Ok(false);
        }

        let record = ItemRecord::new(filename)?;
        let joined = self.root_dir.join(filename);
        let path = joined
            .absolutize()
            .map_err(|source| CatalogError::Path {
                path: joined.clone(),
                source,
            })?
            .into_owned();

        debug!("Registered {key} -> {}", path.display());
        self.graph.insert_vertex(key.clone(), record);
        self.by_filename.insert(filename.to_string(), key.clone());
        self.entries.insert(
            key,
            CatalogEntry {
                filename: filename.to_string(),
                path,
                state: MetadataState::Pending,
            },
        );
        Ok(true)
    }

    /// Drop an item from the metadata table and the graph. Returns whether
    /// anything was removed.
    pub fn remove_item(&mut self, key: &ItemKey) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        self.by_filename.remove(&entry.filename);
        if let Err(err) = self.graph.remove_vertex(key) {
            warn!("Catalog and graph disagreed on {key}: {err}");
        }
        debug!("Removed {key} ({})", entry.filename);
        true
    }

    /// Read tags for `key` through `reader` and apply them.
    ///
    /// A failed read marks the entry [`MetadataState::Failed`] and leaves the
    /// rest of the catalog untouched.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownItem`] for an unregistered key,
    /// [`CatalogError::Ingest`] when the media file is unreadable or corrupt.
    pub fn load_metadata(&mut self, key: &ItemKey, reader: &dyn TagReader) -> CatalogResult<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| CatalogError::UnknownItem(key.clone()))?;

        match reader.read_tags(&entry.path) {
            Ok(tags) => self.apply_tags(key, tags),
            Err(err) => {
                warn!("Metadata for {key} unavailable: {err}");
                entry.state = MetadataState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Replace the record of `key` with one populated from `tags`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownItem`] for an unregistered key.
    pub fn apply_tags(&mut self, key: &ItemKey, tags: MediaTags) -> CatalogResult<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| CatalogError::UnknownItem(key.clone()))?;
        let record = self
            .graph
            .get(key)
            .ok_or_else(|| CatalogError::UnknownItem(key.clone()))?
            .with_tags(tags);

        self.graph.replace_record(key, record)?;
        entry.state = MetadataState::Loaded;
        Ok(())
    }

    /// Record one listening session: every consecutive pair `(a, b)` of known
    /// keys adds one play to the edge `a -> b`. Pairs touching an unknown key
    /// are skipped. Returns the number of plays recorded.
    pub fn ingest_play_sequence(&mut self, sequence: &[ItemKey]) -> usize {
        let mut recorded = 0;

        for pair in sequence.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if !self.contains(from) || !self.contains(to) {
                continue;
            }

            let result = match self.graph.edge_weight(from, to) {
                Some(weight) => self
                    .graph
                    .update_edge_weight(from, to, weight.saturating_add(1)),
                None => self.graph.insert_edge(from, to, 1),
            };
            match result {
                Ok(()) => recorded += 1,
                Err(err) => warn!("Could not record {from} -> {to}: {err}"),
            }
        }

        debug!(
            "Ingested sequence of {} keys, recorded {recorded} transitions",
            sequence.len()
        );
        recorded
    }

    /// Total weight of all edges touching `key`; 0 when unknown.
    pub fn rank(&self, key: &ItemKey) -> u64 {
        let outgoing = self.graph.out_degree_weight(key).unwrap_or(0);
        let incoming = self.graph.in_degree_weight(key).unwrap_or(0);
        outgoing + incoming
    }

    /// `(hops, total_weight)` of the lightest path from `from` to `to`.
    /// `(0, 0)` when either key is unknown or no path exists.
    pub fn distance(&self, from: &ItemKey, to: &ItemKey) -> (usize, u64) {
        let Some(path) = self.graph.shortest_path(from, to) else {
            return (0, 0);
        };
        match self.graph.path_weight(&path) {
            Some(weight) => (path.len() - 1, weight),
            None => (0, 0),
        }
    }

    /// Lightest path from `from` to `to`, both ends included.
    pub fn route(&self, from: &ItemKey, to: &ItemKey) -> Option<Vec<ItemKey>> {
        self.graph.shortest_path(from, to)
    }

    /// Items played right after `key`, with play counts.
    pub fn next_items(&self, key: &ItemKey) -> impl Iterator<Item = (&ItemKey, u32)> + '_ {
        self.graph.edges_out(key).ok().into_iter().flatten()
    }

    /// Items played right before `key`, with play counts.
    pub fn previous_items(&self, key: &ItemKey) -> impl Iterator<Item = (&ItemKey, u32)> + '_ {
        self.graph.edges_in(key).ok().into_iter().flatten()
    }

    /// Keys of loaded items whose `field` contains `needle`, ignoring case.
    /// Sorted ascending.
    pub fn search(&self, field: TextField, needle: &str) -> Vec<ItemKey> {
        let needle = needle.to_lowercase();
        let mut hits: Vec<ItemKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.state == MetadataState::Loaded)
            .filter_map(|(key, _)| self.graph.get(key).map(|record| (key, record)))
            .filter(|(_, record)| field.read(record).to_lowercase().contains(&needle))
            .map(|(key, _)| key.clone())
            .collect();
        hits.sort();
        hits
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> + '_ {
        self.graph.keys().filter(|key| self.entries.contains_key(*key))
    }

    /// Key registered for `filename`, if any.
    pub fn key_for(&self, filename: &str) -> Option<&ItemKey> {
        self.by_filename.get(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: &ItemKey) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn metadata_state(&self, key: &ItemKey) -> Option<&MetadataState> {
        self.entries.get(key).map(|entry| &entry.state)
    }

    /// Full record, once tags are loaded.
    pub fn record(&self, key: &ItemKey) -> Option<&ItemRecord> {
        match self.entries.get(key)?.state {
            MetadataState::Loaded => self.graph.get(key),
            MetadataState::Pending | MetadataState::Failed(_) => None,
        }
    }

    pub fn title(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::title)
    }

    pub fn album(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::album)
    }

    pub fn artist(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::artist)
    }

    pub fn composer(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::composer)
    }

    pub fn genre(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::genre)
    }

    pub fn date(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::date)
    }

    pub fn comment(&self, key: &ItemKey) -> Option<&str> {
        self.record(key).map(ItemRecord::comment)
    }

    /// Duration in whole seconds; `None` when not loaded or unknown.
    pub fn duration(&self, key: &ItemKey) -> Option<u32> {
        self.record(key).and_then(ItemRecord::duration)
    }

    /// Available as soon as the item is registered.
    pub fn filename(&self, key: &ItemKey) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.filename.as_str())
    }

    /// Available as soon as the item is registered.
    pub fn path(&self, key: &ItemKey) -> Option<&Path> {
        self.entries.get(key).map(|entry| entry.path.as_path())
    }

    /// Log a one-line summary of the catalog.
    pub fn log_summary(&self) {
        let loaded = self
            .entries
            .values()
            .filter(|entry| entry.state == MetadataState::Loaded)
            .count();
        info!(
            "Catalog: {} items ({loaded} with metadata), {} transitions",
            self.len(),
            self.graph.edge_count()
        );
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog of {} items under {}",
            self.len(),
            self.root_dir.display()
        )
    }
}
