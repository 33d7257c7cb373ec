//! happieclust is a library for approximate hierarchical agglomerative
//! clustering of time series.
//! Instead of computing all n(n-1)/2 pairwise distances, it samples a sparse
//! distance graph (pivot-space neighbours plus random pairs) and merges
//! greedily over it, producing a SciPy-style linkage matrix.

// Module declarations
pub mod error;
pub mod config;
pub mod distance;
pub mod sampling;
pub mod graph;
pub mod linkage;
pub mod clusterer;
pub mod utils;

// Re-exports
pub use error::{Error, Result};
pub use clusterer::{ClusteringRun, HappieClust, SamplingStats};
pub use distance::Metric;
pub use graph::DistanceGraph;
pub use linkage::{cut_tree, GraphLinkageEngine, LinkageMatrix, LinkageRow};

// Re-export the config from config module
pub use config::{HappieConfig, Linkage, MetricKind};
