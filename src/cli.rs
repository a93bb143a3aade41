//! # Command-Line Interface Module
//!
//! Clap definitions for the `segue` binary. Every command rebuilds the
//! catalog from the library root before answering.
//!
//! ## Commands
//!
//! - `scan`: Build the catalog and print a summary
//! - `rank`: List items by rank
//! - `similar`: Items most similar to a file
//! - `autoplay`: Generate an auto-play list
//! - `search`: Substring search on one tag field
//!
//! ## Examples
//!
//! ```bash
//! segue scan
//! segue similar "Artist/Album/01 Track.mp3" -n 5
//! segue autoplay 10
//! segue --root ~/Music search artist davis
//! ```

use crate::catalog::TextField;
use crate::recommend::MAX_RECOMMENDATIONS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "segue")]
#[command(about = "Segue: recommendations from your own listening history")]
#[command(version)]
pub struct Args {
    /// Library root, overriding the configuration file
    ///
    /// A configured playlist directory inside the old root moves with it.
    /// Extensions still come from the configuration file.
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Skip reading tags from media files
    #[arg(long, global = true)]
    pub no_metadata: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the library and print a catalog summary
    ///
    /// Registers every media file below the root, reads its tags, and replays
    /// the `.m3u` playlists found in the playlist directory.
    Scan,

    /// List items by rank (plays in plus plays out)
    Rank {
        /// Number of items to show
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },

    /// Show the items most similar to a file
    Similar {
        /// Filename relative to the library root
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = MAX_RECOMMENDATIONS)]
        count: usize,
    },

    /// Generate an auto-play list
    Autoplay {
        /// Number of slots in the list
        length: usize,
    },

    /// Find items whose tag field contains some text
    Search {
        /// title, artist, album, composer, genre, date, comment or filename
        field: TextField,

        /// Text to look for, case-insensitive
        text: String,
    },
}
