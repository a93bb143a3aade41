//! # Configuration Module
//!
//! Runtime settings and platform directories for Segue.
//!
//! ## Configuration File
//!
//! Settings are read from `config.json` in the platform configuration
//! directory:
//! - Linux: `~/.config/segue/config.json`
//! - macOS: `~/Library/Application Support/segue/config.json`
//! - Windows: `%APPDATA%\segue\config.json`
//!
//! A missing file means defaults. Every field is optional:
//!
//! ```json
//! {
//!   "root_dir": "/home/user/Music",
//!   "extensions": ["mp3"],
//!   "playlist_dir": "/home/user/Music/playlists"
//! }
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "segue";
const CONFIG_FILE: &str = "config.json";

/// Returns the path of the configuration file, creating the `segue`
/// configuration directory if needed.
///
/// # Platform Behavior
///
/// - **Linux**: `~/.config/segue/config.json`
/// - **macOS**: `~/Library/Application Support/segue/config.json`
/// - **Windows**: `%APPDATA%\segue\config.json`
///
/// # Errors
///
/// This function will return an error if:
/// - The system configuration directory cannot be determined
/// - The segue subdirectory cannot be created due to permissions
///
/// # Examples
///
/// ```no_run
/// use segue::config::get_config_path;
///
/// let path = get_config_path()?;
/// println!("Configuration file: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Please ensure your platform supports standard config directories."
        )
    })?;

    Ok(ensure_dir(config_dir.join(APP_DIR))?.join(CONFIG_FILE))
}

/// Returns the platform data directory for Segue, creating it if needed.
///
/// # Errors
///
/// Fails if the system data directory cannot be determined or created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    ensure_dir(data_dir.join(APP_DIR))
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&dir).with_context(|| {
        format!(
            "Failed to create Segue directory at {}. Please check file permissions.",
            dir.display()
        )
    })?;
    Ok(dir)
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Library root; item filenames are relative to it
    pub root_dir: PathBuf,
    /// Media file extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Directory of `.m3u` play histories; defaults to the library root
    pub playlist_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            root_dir: dirs::audio_dir().unwrap_or_else(|| PathBuf::from(".")),
            extensions: vec!["mp3".to_string()],
            playlist_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load the configuration from the platform configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the configuration directory is unavailable or the file exists
    /// but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::from_file(&get_config_path()?)
    }

    /// Load from an explicit file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Create configuration with an explicit library root
    pub fn with_root_dir(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            ..Self::default()
        }
    }

    /// Point the configuration at another library root.
    ///
    /// A playlist directory inside the old root is moved to the same place
    /// under the new one; one outside it is kept as is.
    pub fn set_root_dir(&mut self, root_dir: PathBuf) {
        if let Some(playlist_dir) = &self.playlist_dir {
            if let Ok(relative) = playlist_dir.strip_prefix(&self.root_dir) {
                let moved = root_dir.join(relative);
                debug!("Playlist directory follows the root to {}", moved.display());
                self.playlist_dir = Some(moved);
            }
        }
        self.root_dir = root_dir;
    }

    /// Where playlists are looked up.
    pub fn playlist_dir(&self) -> &Path {
        self.playlist_dir.as_deref().unwrap_or(&self.root_dir)
    }
}
