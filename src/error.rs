//! Error types for graph, catalog and collaborator operations.
//!
//! Graph errors are always explicit. Catalog convenience queries (rank,
//! distance, attribute getters) swallow them and return neutral values instead.

use crate::item::ItemKey;
use std::path::PathBuf;
use thiserror::Error;

/// Structural errors raised by [`crate::graph::RelationGraph`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The key does not name a vertex
    #[error("Vertex not found: {0}")]
    VertexNotFound(ItemKey),

    /// No edge exists for the ordered pair
    #[error("Edge not found: {from} -> {to}")]
    EdgeNotFound { from: ItemKey, to: ItemKey },
}

/// Errors raised while building an [`crate::item::ItemRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Every record needs a filename
    #[error("Item record requires a non-empty filename")]
    MissingFilename,
}

/// Errors raised by a tag reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The media file could not be read or its tags are corrupt
    #[error("Cannot read tags from {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Errors raised by [`crate::catalog::Catalog`].
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The key is not registered in the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(ItemKey),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Record(#[from] RecordError),

    /// The absolute path of a file could not be resolved
    #[error("Failed to resolve path {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or corrupt source media; the item stays registered
    #[error("Metadata ingestion failed for {path}: {reason}")]
    Ingest { path: PathBuf, reason: String },
}

impl From<TagError> for CatalogError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Unreadable { path, reason } => CatalogError::Ingest { path, reason },
        }
    }
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
