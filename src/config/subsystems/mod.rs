pub mod clustering;
pub mod distance;
pub mod processor;

pub use clustering::{ClusteringConfig, Linkage};
pub use distance::{DistanceConfig, MetricKind};
pub use processor::ProcessorConfig;
