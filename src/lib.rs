//! The graded de Bruijn assembly core: k-mer extraction, the graph itself,
//! tip/bubble cleanup, and Eulerian-cycle spelling. Exposed as a library so
//! each pipeline stage in `src/bin/` can be a small, independent binary.

pub mod bubble;
pub mod error;
pub mod eulerian;
pub mod graph;
pub mod interner;
pub mod kmer;
pub mod optimal_k;
pub mod spelling;
pub mod tip_removal;

pub use error::PipelineError;
pub use graph::DeBruijnGraph;
pub use interner::NodeId;
