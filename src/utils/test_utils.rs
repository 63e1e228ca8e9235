use nalgebra::Point3;
use ndarray::Array3;

use crate::input::{Streamline, StreamlineBundle, VoxelGrid, VoxelSpacing};

/// Generates a straight streamline of `n_points` from `origin`, advancing
/// by `step` between consecutive points.
pub fn straight_streamline(
    origin: (f64, f64, f64),
    step: (f64, f64, f64),
    n_points: usize,
) -> Streamline {
    let mut points = Vec::with_capacity(n_points);
    for i in 0..n_points {
        let t = i as f64;
        points.push(Point3::new(
            origin.0 + t * step.0,
            origin.1 + t * step.1,
            origin.2 + t * step.2,
        ));
    }
    Streamline::new(points)
}

/// Builds a bundle of `n` streamlines running from x=0 to x=10 with a
/// small per-streamline y offset, so the endpoints form two tight groups.
pub fn two_ended_bundle(label: &str, n: usize) -> StreamlineBundle {
    let mut streamlines = Vec::with_capacity(n);
    for i in 0..n {
        let dy = i as f64 * 0.1;
        streamlines.push(Streamline::new(vec![
            Point3::new(0.0, dy, 0.0),
            Point3::new(5.0, dy + 0.5, 0.0),
            Point3::new(10.0, dy, 0.0),
        ]));
    }
    StreamlineBundle::new(label, streamlines)
}

/// A fully occupied grid with uniform spacing.
pub fn filled_grid(dim: (usize, usize, usize), spacing: f64) -> VoxelGrid {
    let data = Array3::<f64>::ones(dim);
    VoxelGrid::new(data, VoxelSpacing::uniform(spacing).unwrap())
}

/// A grid occupied only on one plane of the first axis.
pub fn slab_grid(dim: (usize, usize, usize), plane: usize, spacing: f64) -> VoxelGrid {
    let data = Array3::from_shape_fn(dim, |(i, _, _)| if i == plane { 1.0 } else { 0.0 });
    VoxelGrid::new(data, VoxelSpacing::uniform(spacing).unwrap())
}
