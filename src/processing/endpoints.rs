use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{MetricError, Result};
use crate::input::StreamlineBundle;

const MAX_ITERATIONS: usize = 100;

/// One of the two endpoint groups of a tract, with its centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCluster {
    pub points: Vec<Point3<f64>>,
    pub centroid: Point3<f64>,
}

impl EndpointCluster {
    fn from_points(points: Vec<Point3<f64>>) -> Self {
        let centroid = centroid_of(&points);
        EndpointCluster { points, centroid }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The two terminal surfaces of a tract, oriented along the dominant
/// separating axis. `far` holds the larger coordinate on that axis.
///
/// The named fields replace the positional pair the clustering step
/// produces, so callers cannot silently swap the two ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TractEnds {
    pub far: EndpointCluster,
    pub near: EndpointCluster,
}

/// Collects the first point of every streamline followed by the last
/// point of every streamline.
pub fn collect_endpoints(bundle: &StreamlineBundle) -> Result<Vec<Point3<f64>>> {
    if bundle.is_empty() {
        return Err(MetricError::EmptyBundle);
    }
    let mut endpoints = Vec::with_capacity(2 * bundle.len());
    for streamline in &bundle.streamlines {
        endpoints.push(streamline.endpoints()?.0);
    }
    for streamline in &bundle.streamlines {
        endpoints.push(streamline.endpoints()?.1);
    }
    Ok(endpoints)
}

/// Partitions the endpoints of a bundle into two spatial clusters with
/// 2-means (Lloyd's algorithm, Euclidean metric).
///
/// Initial centroids are drawn from the endpoint set with an RNG seeded by
/// `seed`, so a fixed seed gives a reproducible partition. The result is a
/// local optimum; which cluster comes first is arbitrary and is only
/// disambiguated by [`determine_surface_end`].
pub fn cluster_endpoints(
    bundle: &StreamlineBundle,
    seed: u64,
) -> Result<(EndpointCluster, EndpointCluster)> {
    let endpoints = collect_endpoints(bundle)?;
    kmeans_two(&endpoints, seed)
}

/// Orients an unordered cluster pair into (far, near) ends.
///
/// The dominant separating axis is the coordinate axis with the largest
/// absolute centroid difference; the cluster with the larger centroid
/// coordinate along it becomes `far`. A tie on that axis resolves to the
/// second argument, a repeatable choice rather than a meaningful order.
/// Swapping the arguments leaves the assignment unchanged for distinct
/// centroids.
pub fn determine_surface_end(a: EndpointCluster, b: EndpointCluster) -> TractEnds {
    let diff = a.centroid - b.centroid;
    let mut axis = 0;
    for i in 1..3 {
        if diff[i].abs() > diff[axis].abs() {
            axis = i;
        }
    }
    if a.centroid[axis] > b.centroid[axis] {
        TractEnds { far: a, near: b }
    } else {
        TractEnds { far: b, near: a }
    }
}

fn centroid_of(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

fn farthest_from(points: &[Point3<f64>], reference: &Point3<f64>) -> Point3<f64> {
    *points
        .iter()
        .max_by(|a, b| {
            (*a - reference)
                .norm_squared()
                .partial_cmp(&(*b - reference).norm_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap()
}

fn kmeans_two(points: &[Point3<f64>], seed: u64) -> Result<(EndpointCluster, EndpointCluster)> {
    if points.len() < 2 {
        return Err(MetricError::ClusteringFailure {
            distinct: points.len(),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let mut c0 = points[rng.random_range(0..points.len())];
    let others: Vec<Point3<f64>> = points.iter().copied().filter(|p| *p != c0).collect();
    if others.is_empty() {
        return Err(MetricError::ClusteringFailure { distinct: 1 });
    }
    let mut c1 = others[rng.random_range(0..others.len())];

    let mut labels = vec![0usize; points.len()];
    let mut changed = true;
    let mut iterations = 0;
    while changed && iterations < MAX_ITERATIONS {
        iterations += 1;

        let assignment: Vec<usize> = points
            .iter()
            .map(|p| {
                if (p - c0).norm_squared() <= (p - c1).norm_squared() {
                    0
                } else {
                    1
                }
            })
            .collect();

        // A cluster drained empty: reseed it on the endpoint farthest from
        // the surviving centroid and try again.
        if !assignment.contains(&0) {
            c0 = farthest_from(points, &c1);
            continue;
        }
        if !assignment.contains(&1) {
            c1 = farthest_from(points, &c0);
            continue;
        }

        changed = assignment != labels;
        labels = assignment;

        c0 = centroid_of(&member_points(points, &labels, 0));
        c1 = centroid_of(&member_points(points, &labels, 1));
    }

    let first = member_points(points, &labels, 0);
    let second = member_points(points, &labels, 1);
    Ok((
        EndpointCluster::from_points(first),
        EndpointCluster::from_points(second),
    ))
}

fn member_points(points: &[Point3<f64>], labels: &[usize], label: usize) -> Vec<Point3<f64>> {
    points
        .iter()
        .zip(labels)
        .filter(|(_, l)| **l == label)
        .map(|(p, _)| *p)
        .collect()
}

#[cfg(test)]
mod endpoint_tests {
    use super::*;
    use crate::input::Streamline;
    use crate::utils::test_utils::{straight_streamline, two_ended_bundle};
    use approx::assert_relative_eq;

    #[test]
    fn test_collect_endpoints_order() {
        let bundle = StreamlineBundle::new(
            "test",
            vec![
                straight_streamline((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 3),
                straight_streamline((0.0, 1.0, 0.0), (1.0, 0.0, 0.0), 3),
            ],
        );
        let endpoints = collect_endpoints(&bundle).unwrap();
        assert_eq!(endpoints.len(), 4);
        // firsts, then lasts
        assert_eq!(endpoints[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(endpoints[1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(endpoints[2], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(endpoints[3], Point3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_cluster_splits_shared_endpoints_exactly() {
        // Three streamlines sharing both terminals: only two distinct
        // endpoint positions exist, so any seed recovers them exactly.
        let mid_offsets = [0.5, 1.0, 1.5];
        let streamlines: Vec<Streamline> = mid_offsets
            .iter()
            .map(|dy| {
                Streamline::new(vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(5.0, *dy, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                ])
            })
            .collect();
        let bundle = StreamlineBundle::new("shared", streamlines);

        let (e1, e2) = cluster_endpoints(&bundle, 7).unwrap();
        assert_eq!(e1.len() + e2.len(), 6);
        let (low, high) = if e1.centroid.x < e2.centroid.x {
            (e1, e2)
        } else {
            (e2, e1)
        };
        assert!(low.points.iter().all(|p| p.x == 0.0));
        assert!(high.points.iter().all(|p| p.x == 10.0));
        assert_relative_eq!(low.centroid.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(high.centroid.x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cluster_sizes_and_membership() {
        let bundle = two_ended_bundle("af", 5);
        let endpoints = collect_endpoints(&bundle).unwrap();
        let (e1, e2) = cluster_endpoints(&bundle, 42).unwrap();

        assert_eq!(e1.len() + e2.len(), 2 * bundle.len());
        for point in e1.points.iter().chain(e2.points.iter()) {
            assert!(endpoints.contains(point));
        }
        for point in &endpoints {
            let hits = e1.points.iter().filter(|p| *p == point).count()
                + e2.points.iter().filter(|p| *p == point).count();
            let occurrences = endpoints.iter().filter(|p| *p == point).count();
            assert_eq!(hits, occurrences);
        }
    }

    #[test]
    fn test_cluster_seed_is_reproducible() {
        let bundle = two_ended_bundle("af", 8);
        let run_a = cluster_endpoints(&bundle, 1234).unwrap();
        let run_b = cluster_endpoints(&bundle, 1234).unwrap();
        assert_eq!(run_a, run_b);
    }

    #[test]
    fn test_cluster_fails_on_identical_endpoints() {
        // Closed loops: both terminals of every streamline coincide.
        let loop_streamline = Streamline::new(vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(1.0, 1.0, 1.0),
        ]);
        let bundle = StreamlineBundle::new("loops", vec![loop_streamline.clone(), loop_streamline]);
        assert!(matches!(
            cluster_endpoints(&bundle, 0),
            Err(MetricError::ClusteringFailure { distinct: 1 })
        ));
    }

    #[test]
    fn test_determine_surface_end_picks_dominant_axis() {
        let a = EndpointCluster::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]);
        let b = EndpointCluster::from_points(vec![
            Point3::new(1.0, 10.0, 0.0),
            Point3::new(1.0, 12.0, 0.0),
        ]);
        // y separation (10 units) dominates x separation (1 unit)
        let ends = determine_surface_end(a.clone(), b.clone());
        assert_eq!(ends.far, b);
        assert_eq!(ends.near, a);
    }

    #[test]
    fn test_determine_surface_end_swap_invariant() {
        let a = EndpointCluster::from_points(vec![Point3::new(0.0, 0.0, 0.0)]);
        let b = EndpointCluster::from_points(vec![Point3::new(10.0, 1.0, 1.0)]);

        let forward = determine_surface_end(a.clone(), b.clone());
        let swapped = determine_surface_end(b.clone(), a.clone());
        assert_eq!(forward.far, swapped.far);
        assert_eq!(forward.near, swapped.near);
        assert_eq!(forward.far, b);
    }
}
