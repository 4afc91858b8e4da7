//! hoplite: landmark-based approximation of shortest-path hop distances.
//!
//! The pipeline: pick landmark nodes with a centrality heuristic, BFS the
//! graph once per landmark into a persisted distance table, then answer
//! pairwise distance queries with the triangle-inequality upper bound
//! `min over landmarks m of dist(m, s) + dist(m, t)`, and score each
//! selection strategy by the aggregate relative error against exact
//! ground-truth distances.

pub mod centrality;
pub mod estimate;
pub mod experiment;
pub mod graph;
pub mod pairs;
pub mod selection;
pub mod stats;
pub mod table;

use thiserror::Error as ThisError;

pub use graph::{Graph, NodeId};

/// Crate-wide error taxonomy. Estimation-time misses are never skipped;
/// they indicate a table/pair-set mismatch and surface as `MissingData`.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("distance table has no entry for node {node} under landmark {landmark}")]
    MissingData { landmark: String, node: String },

    #[error("graph is disconnected at {0}")]
    Disconnected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
