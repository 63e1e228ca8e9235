pub mod errors;
pub mod input;
pub mod processing;
pub mod utils;

pub use errors::{MetricError, Result};
pub use input::{Streamline, StreamlineBundle, VoxelGrid, VoxelSpacing};
pub use processing::endpoints::{EndpointCluster, TractEnds};
pub use processing::statistics::TractStatistics;
pub use processing::{analyze_bundle, analyze_bundles, TractAnalysis};
