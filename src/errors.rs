//! Error types for the tract metric computations.

use thiserror::Error;

/// Result type alias for tract metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Errors raised by the metric functions on degenerate or invalid input.
///
/// Non-finite derived ratios (e.g. an infinite elongation when the voxel
/// volume is zero) are not errors; they pass through as explicit non-finite
/// fields and are reported via [`crate::TractStatistics::non_finite_fields`].
#[derive(Error, Debug)]
pub enum MetricError {
    /// A streamline too short to carry any geometry.
    #[error("streamline has {points} point(s), need at least 2")]
    ShortStreamline { points: usize },

    /// A bundle with no streamlines in it.
    #[error("bundle contains no streamlines")]
    EmptyBundle,

    /// Every streamline closes on itself, curl is undefined.
    #[error("mean span is zero, cannot derive curl")]
    ZeroMeanSpan,

    /// The cylinder model needs a strictly positive mean length.
    #[error("mean length {0} is not strictly positive")]
    NonPositiveMeanLength(f64),

    /// Voxel spacing components must be finite and strictly positive.
    #[error("invalid voxel spacing ({x}, {y}, {z})")]
    InvalidSpacing { x: f64, y: f64, z: f64 },

    /// Fewer than two distinct endpoints to split into two clusters.
    #[error("cannot split {distinct} distinct endpoint(s) into two clusters")]
    ClusteringFailure { distinct: usize },
}
