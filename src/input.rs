use nalgebra::Point3;
use ndarray::Array3;

use crate::errors::{MetricError, Result};

/// One reconstructed fiber path, an ordered run of 3D points.
///
/// Consecutive points define line segments. All metrics require at least
/// two points; shorter streamlines fail fast instead of yielding zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    pub points: Vec<Point3<f64>>,
}

impl Streamline {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Streamline { points }
    }

    /// Sum of Euclidean distances between consecutive points.
    pub fn length(&self) -> Result<f64> {
        if self.points.len() < 2 {
            return Err(MetricError::ShortStreamline {
                points: self.points.len(),
            });
        }
        Ok(self
            .points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum())
    }

    /// Euclidean distance between the first and last point.
    pub fn span(&self) -> Result<f64> {
        if self.points.len() < 2 {
            return Err(MetricError::ShortStreamline {
                points: self.points.len(),
            });
        }
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        Ok((last - first).norm())
    }

    /// The two terminal points of the path.
    pub fn endpoints(&self) -> Result<(Point3<f64>, Point3<f64>)> {
        if self.points.len() < 2 {
            return Err(MetricError::ShortStreamline {
                points: self.points.len(),
            });
        }
        Ok((self.points[0], self.points[self.points.len() - 1]))
    }
}

/// An ordered collection of streamlines belonging to one tract.
///
/// The order only matters for aligning per-streamline metric sequences;
/// the aggregated statistics are order-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamlineBundle {
    pub label: String,
    pub streamlines: Vec<Streamline>,
}

impl StreamlineBundle {
    pub fn new(label: impl Into<String>, streamlines: Vec<Streamline>) -> Self {
        StreamlineBundle {
            label: label.into(),
            streamlines,
        }
    }

    pub fn len(&self) -> usize {
        self.streamlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streamlines.is_empty()
    }
}

/// Physical size of a voxel along each axis, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelSpacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl VoxelSpacing {
    /// Every component must be finite and strictly positive.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(x) || !valid(y) || !valid(z) {
            return Err(MetricError::InvalidSpacing { x, y, z });
        }
        Ok(VoxelSpacing { x, y, z })
    }

    /// Same spacing along all three axes.
    pub fn uniform(value: f64) -> Result<Self> {
        Self::new(value, value, value)
    }

    /// Euclidean norm of the spacing vector.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Volume of a single voxel.
    pub fn voxel_volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

/// A 3D grid of non-negative visitation counts, one cell per anatomical
/// voxel, paired with the physical voxel spacing of the scan it was
/// rasterized against.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    pub data: Array3<f64>,
    spacing: VoxelSpacing,
}

impl VoxelGrid {
    pub fn new(data: Array3<f64>, spacing: VoxelSpacing) -> Self {
        VoxelGrid { data, spacing }
    }

    pub fn spacing(&self) -> VoxelSpacing {
        self.spacing
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// A cell is occupied iff its count is strictly positive.
    pub fn is_occupied(&self, index: (usize, usize, usize)) -> bool {
        self.data[[index.0, index.1, index.2]] > 0.0
    }

    /// Number of occupied (non-zero) voxels.
    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|v| **v > 0.0).count()
    }
}
