use anyhow::Context;
use rayon::prelude::*;

pub mod endpoints;
pub mod statistics;
pub mod streamlines;
pub mod surface;

use crate::input::{StreamlineBundle, VoxelGrid};
use crate::processing::endpoints::{cluster_endpoints, determine_surface_end, TractEnds};
use crate::processing::statistics::TractStatistics;
use crate::processing::streamlines::{streamline_lengths, streamline_spans};

/// Everything the pipeline derives from one (bundle, voxel grid) pair:
/// the oriented terminal surfaces and the composite statistics record.
#[derive(Debug, Clone, PartialEq)]
pub struct TractAnalysis {
    pub ends: TractEnds,
    pub statistics: TractStatistics,
}

/// Runs the full analysis pipeline for one bundle.
///
/// `n_occupied` is the non-zero voxel count from the voxelization
/// collaborator (use [`VoxelGrid::occupied_count`] when voxelizing
/// in-memory). `seed` pins the endpoint clustering initialization.
pub fn analyze_bundle(
    bundle: &StreamlineBundle,
    grid: &VoxelGrid,
    n_occupied: usize,
    seed: u64,
) -> anyhow::Result<TractAnalysis> {
    let (e1, e2) = cluster_endpoints(bundle, seed)
        .context(format!("clustering endpoints of bundle ({})", bundle.label))?;
    let ends = determine_surface_end(e1, e2);

    let lengths = streamline_lengths(bundle)
        .context(format!("computing lengths of bundle ({})", bundle.label))?;
    let spans = streamline_spans(bundle)
        .context(format!("computing spans of bundle ({})", bundle.label))?;

    let statistics = TractStatistics::compose(&lengths, &spans, n_occupied, grid)
        .context(format!("composing statistics of bundle ({})", bundle.label))?;

    Ok(TractAnalysis { ends, statistics })
}

/// Sweeps the pipeline over many (bundle, grid) pairs in parallel.
///
/// A failed bundle is reported and yields no row; the rest of the batch
/// keeps going. Records with non-finite derived ratios are kept and
/// called out per bundle.
pub fn analyze_bundles(
    cases: &[(StreamlineBundle, VoxelGrid)],
    seed: u64,
) -> Vec<(String, TractAnalysis)> {
    cases
        .par_iter()
        .filter_map(|(bundle, grid)| {
            let n_occupied = grid.occupied_count();
            match analyze_bundle(bundle, grid, n_occupied, seed) {
                Ok(analysis) => {
                    let flagged = analysis.statistics.non_finite_fields();
                    if !flagged.is_empty() {
                        eprintln!(
                            "Warning: bundle {} has non-finite fields: {:?}",
                            bundle.label, flagged
                        );
                    }
                    println!("Computed statistics for bundle {}", bundle.label);
                    Some((bundle.label.clone(), analysis))
                }
                Err(e) => {
                    eprintln!("Error processing bundle {}: {:#}", bundle.label, e);
                    None
                }
            }
        })
        .collect()
}
