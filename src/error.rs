//! Error taxonomy for the de Bruijn pipeline.
//!
//! Mirrors the donor's preference for small, hand-rolled error types over a
//! crate like thiserror: a plain enum with `Display` and `std::error::Error`.

use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// Input couldn't be parsed into the shape a stage expects (bad integer,
    /// mismatched k-mer lengths, empty input where at least one token is required).
    MalformedInput(String),
    /// The Hierholzer engine ran out of pending nodes with unconsumed edges
    /// remaining. Indicates tip/bubble cleanup did not balance the graph.
    StalledTraversal { remaining_edges: usize },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
            PipelineError::StalledTraversal { remaining_edges } => write!(
                f,
                "eulerian traversal stalled with {} edge(s) unconsumed and no pending node; \
                 graph is not balanced",
                remaining_edges
            ),
        }
    }
}

impl std::error::Error for PipelineError {}
