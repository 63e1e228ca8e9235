use crate::errors::{MetricError, Result};
use crate::input::StreamlineBundle;

/// Computes the length of each streamline in the bundle, in bundle order.
pub fn streamline_lengths(bundle: &StreamlineBundle) -> Result<Vec<f64>> {
    if bundle.is_empty() {
        return Err(MetricError::EmptyBundle);
    }
    bundle.streamlines.iter().map(|s| s.length()).collect()
}

/// Computes the span of each streamline in the bundle, in bundle order.
pub fn streamline_spans(bundle: &StreamlineBundle) -> Result<Vec<f64>> {
    if bundle.is_empty() {
        return Err(MetricError::EmptyBundle);
    }
    bundle.streamlines.iter().map(|s| s.span()).collect()
}
