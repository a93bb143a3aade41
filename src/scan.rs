//! # Filesystem Scanning
//!
//! Collects media files below a root directory as root-relative filenames
//! (forward slashes on every platform). The previous snapshot is kept so
//! callers can register additions and drop removals after a rescan.

use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Media file collection under one root directory.
#[derive(Debug, Clone)]
pub struct MediaScanner {
    root_dir: PathBuf,
    extensions: Vec<String>,
    current: BTreeSet<String>,
    previous: BTreeSet<String>,
}

impl MediaScanner {
    /// Scanner for files ending in any of `extensions` (case-insensitive,
    /// without the leading dot).
    pub fn new(root_dir: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root_dir: root_dir.into(),
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            current: BTreeSet::new(),
            previous: BTreeSet::new(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Rescan the root directory. Returns the number of files found.
    ///
    /// # Errors
    ///
    /// Fails if a directory below the root cannot be listed.
    pub fn reload(&mut self) -> Result<usize> {
        let mut found = BTreeSet::new();
        walk_dir(&self.root_dir, &self.extensions, &mut found)?;

        self.previous = std::mem::replace(&mut self.current, found);
        info!(
            "Scanned {}: {} media files",
            self.root_dir.display(),
            self.current.len()
        );
        Ok(self.current.len())
    }

    /// Files present now but not before the last reload, sorted.
    pub fn files_added(&self) -> Vec<String> {
        self.current.difference(&self.previous).cloned().collect()
    }

    /// Files present before the last reload but gone now, sorted.
    pub fn files_removed(&self) -> Vec<String> {
        self.previous.difference(&self.current).cloned().collect()
    }

    /// Current files, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.current.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Whether `path` ends in one of the scanner's extensions.
    pub fn is_media(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

fn walk_dir(root: &Path, extensions: &[String], out: &mut BTreeSet<String>) -> Result<()> {
    // Directory links are listed but not descended into.
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_dir() || !has_extension(entry.path(), extensions) {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            let relative = relative.to_string_lossy().replace('\\', "/");
            debug!("Found {relative}");
            out.insert(relative);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted)))
        .unwrap_or(false)
}
