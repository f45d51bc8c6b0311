//! TRC-level graph merging.
//!
//! Merges two TRC files by combining their graphs and recomputing flags.

use thiserror::Error;

use torc_core::graph::GraphError;

use crate::format::{TrcError, TrcFile};

/// Errors that can occur during TRC file merging.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("TRC format error: {0}")]
    Trc(#[from] TrcError),

    #[error("graph merge error: {0}")]
    Graph(#[from] GraphError),
}

/// Merge two TRC files into a new one.
///
/// Takes ownership of `base` and merges `other`'s graph into it.
/// The result has flags recomputed from the combined graph.
pub fn merge_trc_files(base: TrcFile, other: &TrcFile) -> Result<TrcFile, MergeError> {
    let mut graph = base.graph;
    graph.merge(&other.graph)?;
    Ok(TrcFile::new(graph))
}
