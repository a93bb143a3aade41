//! Media recommendations learned from play history.
//!
//! Core modules:
//! - [`graph`] - Weighted directed relationship graph and Dijkstra
//! - [`catalog`] - Items, metadata and play-sequence ingestion
//! - [`recommend`] - Similarity, similar items and auto-play
//!
//! ### Supporting Modules
//!
//! - [`item`] - Item keys, records and tag payloads
//! - [`error`] - Error types
//! - [`keys`] - Deterministic keys derived from filenames
//! - [`scan`] - Filesystem scanning
//! - [`tags`] - ID3 tag extraction
//! - [`playlist`] - M3U play histories
//! - [`library`] - Collaborators wired to a catalog
//! - [`config`] - Configuration and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//!
//! ## Quick Start Example
//!
//! ```
//! use segue::{Catalog, ItemKey, Recommender};
//!
//! let mut catalog = Catalog::new("/music");
//! for name in ["a", "b", "c"] {
//!     catalog.add_item(ItemKey::from(name), &format!("{name}.mp3"))?;
//! }
//!
//! // Two listening sessions: a, b, c and a, b.
//! let a = ItemKey::from("a");
//! let b = ItemKey::from("b");
//! let c = ItemKey::from("c");
//! catalog.ingest_play_sequence(&[a.clone(), b.clone(), c.clone()]);
//! catalog.ingest_play_sequence(&[a.clone(), b.clone()]);
//!
//! assert_eq!(catalog.rank(&b), 3);
//! assert_eq!(catalog.distance(&a, &c), (2, 3));
//!
//! let engine = Recommender::new(&catalog);
//! assert_eq!(engine.similar_items(&a, 10), vec![b.clone(), c.clone()]);
//! assert_eq!(engine.auto_play(1), vec![Some(b)]);
//! # Ok::<(), segue::CatalogError>(())
//! ```
//!
//! ## Scoring
//!
//! The rank of an item is the number of recorded transitions into and out of
//! it. Similarity between two items follows the lightest path in each
//! direction and weighs it by the rank of the starting item; see
//! [`recommend`] for the formula and the auto-play stages.
//!
//! ## Error Handling
//!
//! Graph and catalog operations return typed errors from [`error`]. The
//! filesystem collaborators and the binary use `anyhow::Result`. A media file
//! with unreadable tags never aborts ingestion; the item stays in the catalog
//! without metadata.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod item;
pub mod keys;
pub mod library;
pub mod playlist;
pub mod recommend;
pub mod scan;
pub mod tags;

pub use catalog::{Catalog, MetadataState, SharedCatalog, TextField};
pub use error::{CatalogError, GraphError, RecordError, TagError};
pub use graph::RelationGraph;
pub use item::{ItemKey, ItemRecord, MediaTags};
pub use library::Library;
pub use recommend::{Recommender, MAX_RECOMMENDATIONS};
