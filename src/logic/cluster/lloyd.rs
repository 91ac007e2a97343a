//! Lloyd's Iteration (K-Means)
//!
//! Alternates nearest-centroid assignment with centroid recomputation until
//! the assignment stabilizes, centroid movement drops below epsilon, or the
//! iteration cap is reached. Reaching the cap is not an error; the engine
//! returns the best state reached.
//!
//! The per-point assignment pass is parallel: points are independent and
//! read shared centroids only, and the output is index-addressed, so the
//! reduction is order-independent and determinism is preserved.

use rayon::prelude::*;

use crate::logic::features::layout::FEATURE_COUNT;
use crate::logic::features::vector::squared_distance;
use crate::logic::features::FeatureVector;

use super::rng::DeterministicRng;
use super::Centroid;

/// Iteration cap
pub const MAX_ITERATIONS: usize = 100;

/// Centroid movement below this counts as converged
pub const CONVERGENCE_EPSILON: f64 = 1e-6;

// ============================================================================
// OUTCOME
// ============================================================================

/// Final state of a Lloyd run
#[derive(Debug, Clone)]
pub struct LloydOutcome {
    /// Per-point cluster id, positional-parallel to the input vectors
    pub assignments: Vec<usize>,
    /// Final centroids, indexed by cluster id
    pub centroids: Vec<Centroid>,
    pub iterations: usize,
    pub converged: bool,
}

// ============================================================================
// ITERATION
// ============================================================================

/// Run Lloyd's algorithm from the given initial centroids.
pub fn run(
    vectors: &[FeatureVector],
    mut centroids: Vec<Centroid>,
    rng: &mut DeterministicRng,
) -> LloydOutcome {
    let k = centroids.len();
    let mut assignments = assign_all(vectors, &centroids);
    let mut converged = false;
    let mut iterations = 0;

    for iteration in 1..=MAX_ITERATIONS {
        iterations = iteration;

        let previous_centroids = centroids.clone();
        recompute_centroids(vectors, &assignments, &mut centroids, rng);

        let next_assignments = assign_all(vectors, &centroids);
        let assignments_stable = next_assignments == assignments;
        let max_movement = max_centroid_movement(&previous_centroids, &centroids);
        assignments = next_assignments;

        if assignments_stable || max_movement < CONVERGENCE_EPSILON {
            converged = true;
            break;
        }
    }

    if !converged {
        log::debug!(
            "lloyd iteration stopped at cap ({} iterations, k={})",
            MAX_ITERATIONS,
            k
        );
    }

    LloydOutcome {
        assignments,
        centroids,
        iterations,
        converged,
    }
}

/// Nearest centroid for every point (ties break to the lowest cluster id)
fn assign_all(vectors: &[FeatureVector], centroids: &[Centroid]) -> Vec<usize> {
    vectors
        .par_iter()
        .map(|v| nearest_centroid(v, centroids))
        .collect()
}

fn nearest_centroid(vector: &FeatureVector, centroids: &[Centroid]) -> usize {
    let mut best = 0usize;
    let mut best_distance = f64::MAX;
    for (index, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(&vector.values, centroid);
        if d < best_distance {
            best_distance = d;
            best = index;
        }
    }
    best
}

/// Recompute each centroid as the mean of its members. A cluster with no
/// members is reseeded to a random data point instead of being left
/// undefined.
fn recompute_centroids(
    vectors: &[FeatureVector],
    assignments: &[usize],
    centroids: &mut [Centroid],
    rng: &mut DeterministicRng,
) {
    let k = centroids.len();
    let mut sums = vec![[0.0f64; FEATURE_COUNT]; k];
    let mut counts = vec![0usize; k];

    for (vector, &cluster) in vectors.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (axis, value) in vector.values.iter().enumerate() {
            sums[cluster][axis] += value;
        }
    }

    for cluster in 0..k {
        if counts[cluster] == 0 {
            let replacement = rng.next_index(vectors.len());
            centroids[cluster] = vectors[replacement].values;
            log::debug!("reseeded empty cluster {} from point {}", cluster, replacement);
            continue;
        }
        for axis in 0..FEATURE_COUNT {
            centroids[cluster][axis] = sums[cluster][axis] / counts[cluster] as f64;
        }
    }
}

fn max_centroid_movement(before: &[Centroid], after: &[Centroid]) -> f64 {
    before
        .iter()
        .zip(after.iter())
        .map(|(a, b)| squared_distance(a, b).sqrt())
        .fold(0.0, f64::max)
}

// ============================================================================
// TESTS
// ============================================================================
