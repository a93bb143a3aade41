//! # Segue
//!
//! Recommends what to play next from the transitions recorded in your own
//! playlists. Works entirely offline on a directory of media files.
//!
//! ## Usage
//!
//! ```bash
//! # Build the catalog and show a summary
//! segue scan
//!
//! # Most played-through items
//! segue rank -n 10
//!
//! # Related items and auto-play lists
//! segue similar "Artist/Album/01 Track.mp3"
//! segue autoplay 20
//!
//! # Search tags
//! segue search album "kind of blue"
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{debug, info};
use segue::catalog::Catalog;
use segue::cli::{Args, Command};
use segue::config::RuntimeConfig;
use segue::item::ItemKey;
use segue::library::Library;
use segue::recommend::Recommender;
use segue::tags::{Id3TagReader, TagReader};

/// Main entry point for Segue.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug segue scan` - Enable debug logging
/// - `RUST_LOG=segue::graph=trace segue similar a.mp3` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = RuntimeConfig::load()?;
    if let Some(root) = args.root {
        config.set_root_dir(root);
    }
    debug!("Configuration: {config:?}");

    info!("Building catalog from: {}", config.root_dir.display());
    let reader = Id3TagReader;
    let tag_reader: Option<&dyn TagReader> = if args.no_metadata { None } else { Some(&reader) };
    let library = Library::open(&config, tag_reader)?;
    let catalog = library.catalog();
    let engine = Recommender::new(catalog);

    match args.command {
        Command::Scan => {
            println!("{catalog}");
            println!(
                "{} transitions between {} items",
                catalog.graph().edge_count(),
                catalog.len()
            );
        }
        Command::Rank { count } => {
            let mut ranked: Vec<(u64, &ItemKey)> =
                catalog.keys().map(|key| (catalog.rank(key), key)).collect();
            ranked.sort_by(|(rank_a, key_a), (rank_b, key_b)| {
                rank_b.cmp(rank_a).then_with(|| key_a.cmp(key_b))
            });
            for (rank, key) in ranked.into_iter().take(count) {
                println!("{rank:>6}  {}", describe(catalog, key));
            }
        }
        Command::Similar { file, count } => {
            let key = library
                .key_for(&file)
                .ok_or_else(|| anyhow!("Not in the library: {file}"))?;
            for other in engine.similar_items(key, count) {
                println!(
                    "{:>8.2}  {}",
                    engine.similarity(key, &other),
                    describe(catalog, &other)
                );
            }
        }
        Command::Autoplay { length } => {
            for (position, slot) in engine.auto_play(length).iter().enumerate() {
                match slot {
                    Some(key) => println!("{:>3}. {}", position + 1, describe(catalog, key)),
                    None => println!("{:>3}. -", position + 1),
                }
            }
        }
        Command::Search { field, text } => {
            let hits = catalog.search(field, &text);
            if hits.is_empty() {
                println!("No matches for \"{text}\"");
            }
            for key in hits {
                println!("{}", describe(catalog, &key));
            }
        }
    }

    Ok(())
}

/// "Artist - Title" when tags are loaded, otherwise the filename.
fn describe(catalog: &Catalog, key: &ItemKey) -> String {
    match (catalog.artist(key), catalog.title(key)) {
        (Some(artist), Some(title)) if !artist.is_empty() && !title.is_empty() => {
            format!("{artist} - {title}")
        }
        _ => catalog.filename(key).unwrap_or(key.as_str()).to_string(),
    }
}
