use serde::Serialize;
use std::f64::consts::PI;

use crate::errors::{MetricError, Result};
use crate::input::VoxelGrid;
use crate::processing::surface::{surface_area, surface_volume};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Curl of the bundle: twice the mean length over the mean span.
///
/// A straight bundle has curl near 2; higher values mean the fibers wind.
pub fn curl(lengths: &[f64], spans: &[f64]) -> Result<f64> {
    if lengths.is_empty() || spans.is_empty() {
        return Err(MetricError::EmptyBundle);
    }
    let mean_span = mean(spans);
    if mean_span == 0.0 {
        return Err(MetricError::ZeroMeanSpan);
    }
    Ok(2.0 * mean(lengths) / mean_span)
}

/// Diameter of the cylinder with the bundle's volume and mean length.
pub fn diameter(surface_volume: f64, mean_length: f64) -> Result<f64> {
    if !(mean_length > 0.0) {
        return Err(MetricError::NonPositiveMeanLength(mean_length));
    }
    Ok(2.0 * (surface_volume / (PI * mean_length)).sqrt())
}

/// Aspect ratio of the cylinder model.
pub fn elongation(mean_length: f64, diameter: f64) -> f64 {
    mean_length / diameter
}

/// Ratio of the actual lateral surface area to the ideal cylinder's
/// lateral surface area; 1.0 for a perfect cylinder.
pub fn irregularity(surface_area: f64, diameter: f64, mean_length: f64) -> f64 {
    surface_area / (PI * diameter * mean_length)
}

/// Radius of the disc with the given area.
pub fn radius_from_area(area: f64) -> f64 {
    (area / PI).sqrt()
}

/// Irregularity of a terminal surface: disc area over actual area.
pub fn end_irregularity(area: f64, radius: f64) -> f64 {
    (PI * radius * radius) / area
}

/// The shape statistics record of one (bundle, voxel grid) pair.
///
/// Immutable once composed; the reporting collaborator serializes these
/// into per-subject tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TractStatistics {
    pub mean_length: f64,
    /// Half the raw mean span (single-ended span convention).
    pub mean_span: f64,
    pub curl: f64,
    pub diameter: f64,
    pub elongation: f64,
    pub total_volume: f64,
    pub total_surface_area: f64,
    pub irregularity: f64,
}

impl TractStatistics {
    /// Composes the full record from per-streamline metric sequences and
    /// the voxelized tract.
    ///
    /// `n_occupied` is the non-zero voxel count reported by the
    /// voxelization collaborator. Degenerate inputs (empty bundle, zero
    /// mean span, non-positive mean length) fail here instead of leaking
    /// NaN into the record; a record is either complete or not emitted.
    pub fn compose(
        lengths: &[f64],
        spans: &[f64],
        n_occupied: usize,
        grid: &VoxelGrid,
    ) -> Result<TractStatistics> {
        if lengths.is_empty() || spans.is_empty() {
            return Err(MetricError::EmptyBundle);
        }

        let curl = curl(lengths, spans)?;
        let voxel_volume = grid.spacing().voxel_volume();
        let total_volume = surface_volume(n_occupied, voxel_volume);
        let total_surface_area = surface_area(grid);

        let mean_length = mean(lengths);
        let diameter = diameter(total_volume, mean_length)?;
        let elongation = elongation(mean_length, diameter);
        let irregularity = irregularity(total_surface_area, diameter, mean_length);

        Ok(TractStatistics {
            mean_length,
            mean_span: mean(spans) / 2.0,
            curl,
            diameter,
            elongation,
            total_volume,
            total_surface_area,
            irregularity,
        })
    }

    /// Names of the fields that came out non-finite.
    ///
    /// An empty occupied set drives the diameter to zero and the
    /// elongation to infinity; such records are still emitted, and the
    /// caller decides whether to report or drop them.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("mean_length", self.mean_length),
            ("mean_span", self.mean_span),
            ("curl", self.curl),
            ("diameter", self.diameter),
            ("elongation", self.elongation),
            ("total_volume", self.total_volume),
            ("total_surface_area", self.total_surface_area),
            ("irregularity", self.irregularity),
        ];
        fields
            .iter()
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect()
    }
}
