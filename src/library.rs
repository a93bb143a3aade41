//! # Library Assembly
//!
//! Wires the collaborators to the catalog: scan the root, derive keys,
//! register items, read tags, replay playlists. [`Library::refresh`] applies
//! a rescan incrementally.

use crate::catalog::Catalog;
use crate::config::RuntimeConfig;
use crate::item::ItemKey;
use crate::keys::KeyRegistry;
use crate::playlist::Playlist;
use crate::scan::MediaScanner;
use crate::tags::TagReader;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog together with the scanner and key registry that feed it.
#[derive(Debug)]
pub struct Library {
    catalog: Catalog,
    registry: KeyRegistry,
    scanner: MediaScanner,
    extensions: Vec<String>,
    playlist_dir: PathBuf,
}

/// Counts from one [`Library::refresh`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub added: usize,
    pub removed: usize,
    pub metadata_failures: usize,
}

impl Library {
    /// Scan `config.root_dir`, register every media file, read tags with
    /// `reader` (if any) and replay the playlists in the playlist directory.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be scanned, an item path cannot be resolved,
    /// or a playlist cannot be read. Unreadable tags are logged and leave
    /// the item without metadata.
    pub fn open(config: &RuntimeConfig, reader: Option<&dyn TagReader>) -> Result<Self> {
        let mut library = Self {
            catalog: Catalog::new(&config.root_dir),
            registry: KeyRegistry::new(),
            scanner: MediaScanner::new(&config.root_dir, &config.extensions),
            extensions: config.extensions.clone(),
            playlist_dir: config.playlist_dir().to_path_buf(),
        };

        library.refresh(reader)?;
        let plays = library.replay_playlists()?;
        info!("Replayed {plays} transitions from playlists");
        library.catalog.log_summary();
        Ok(library)
    }

    /// Rescan the root: register new files and drop vanished ones.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be scanned or a new item path cannot be
    /// resolved.
    pub fn refresh(&mut self, reader: Option<&dyn TagReader>) -> Result<RefreshSummary> {
        self.scanner.reload()?;
        let mut summary = RefreshSummary::default();

        for filename in self.scanner.files_removed() {
            if let Some(key) = self.registry.get(&filename).cloned() {
                self.registry.remove(&key);
                if self.catalog.remove_item(&key) {
                    summary.removed += 1;
                }
            }
        }

        let mut fresh: Vec<ItemKey> = Vec::new();
        for filename in self.scanner.files_added() {
            let Some(key) = self.registry.generate(&filename) else {
                continue;
            };
            let added = self
                .catalog
                .add_item(key.clone(), &filename)
                .with_context(|| format!("Failed to register {filename}"))?;
            if added {
                fresh.push(key);
            }
        }
        summary.added = fresh.len();

        if let Some(reader) = reader {
            summary.metadata_failures = fresh
                .iter()
                .filter(|key| self.catalog.load_metadata(key, reader).is_err())
                .count();
            if summary.metadata_failures > 0 {
                warn!(
                    "{} of {} new items have no metadata",
                    summary.metadata_failures,
                    fresh.len()
                );
            }
        }

        debug!("Refresh: {summary:?}");
        Ok(summary)
    }

    /// Ingest every `.m3u` file in the playlist directory, in filename order.
    /// Returns the number of transitions recorded.
    ///
    /// # Errors
    ///
    /// Fails if the directory exists but cannot be listed, or a playlist
    /// cannot be read.
    pub fn replay_playlists(&mut self) -> Result<usize> {
        let files = playlist_files(&self.playlist_dir)?;
        let mut plays = 0;
        for path in files {
            let playlist = Playlist::load(&path, &self.registry, &self.extensions)?;
            plays += self.catalog.ingest_play_sequence(playlist.keys());
        }
        Ok(plays)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Key of a root-relative filename.
    pub fn key_for(&self, filename: &str) -> Option<&ItemKey> {
        self.registry.get(&filename.replace('\\', "/"))
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

fn playlist_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!("No playlist directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        let is_m3u = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("m3u"));
        if is_m3u && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
