use ndarray::Array3;

use crate::input::{VoxelGrid, VoxelSpacing};

/// Extracts the surface voxels of the occupied set.
///
/// A voxel is surface iff it is occupied and at least one of its six
/// face neighbors is unoccupied, i.e. occupied-and-not-in-the-erosion of
/// the binarized grid. Out-of-bounds neighbors count as unoccupied, so
/// occupied voxels on the grid border are always surface.
pub fn surface_voxels(grid: &VoxelGrid) -> Array3<bool> {
    let (nx, ny, nz) = grid.dim();

    let occupied = |i: isize, j: isize, k: isize| -> bool {
        if i < 0 || j < 0 || k < 0 {
            return false;
        }
        let (i, j, k) = (i as usize, j as usize, k as usize);
        if i >= nx || j >= ny || k >= nz {
            return false;
        }
        grid.is_occupied((i, j, k))
    };

    Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
        if !grid.is_occupied((i, j, k)) {
            return false;
        }
        let (i, j, k) = (i as isize, j as isize, k as isize);
        !(occupied(i - 1, j, k)
            && occupied(i + 1, j, k)
            && occupied(i, j - 1, k)
            && occupied(i, j + 1, k)
            && occupied(i, j, k - 1)
            && occupied(i, j, k + 1))
    })
}

/// Number of surface voxels in the grid.
pub fn surface_voxel_count(grid: &VoxelGrid) -> usize {
    surface_voxels(grid).iter().filter(|v| **v).count()
}

/// Surface area approximation: surface voxel count times the squared
/// Euclidean norm of the spacing vector.
pub fn surface_area(grid: &VoxelGrid) -> f64 {
    let spacing_norm = grid.spacing().norm();
    surface_voxel_count(grid) as f64 * spacing_norm * spacing_norm
}

/// Total volume of the occupied set: N occupied voxels times the volume
/// of a single voxel. N is supplied by the voxelization collaborator.
pub fn surface_volume(n_occupied: usize, voxel_volume: f64) -> f64 {
    n_occupied as f64 * voxel_volume
}

/// Area of an end cap: surface voxel count times the x/y face area of a
/// voxel. Total area, not area per voxel.
pub fn end_surface_area(surface_voxel_count: usize, spacing: &VoxelSpacing) -> f64 {
    surface_voxel_count as f64 * (spacing.x * spacing.y)
}
