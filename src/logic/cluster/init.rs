//! K-Means++ Initialization
//!
//! Chooses initial centroids spread across the data: the first uniformly at
//! random, each subsequent one by roulette-wheel selection weighted by the
//! squared distance to the nearest already-chosen centroid. Spreading the
//! seeds reduces the chance of a poor local optimum versus uniform random
//! initialization.

use crate::logic::error::AnalysisError;
use crate::logic::features::vector::squared_distance;
use crate::logic::features::FeatureVector;

use super::rng::DeterministicRng;
use super::Centroid;

/// Pick `k` initial centroids from the data points.
///
/// Fails with `InsufficientData` when `k` exceeds the number of vectors
/// or when `k` is zero.
pub fn kmeans_pp_init(
    vectors: &[FeatureVector],
    k: usize,
    rng: &mut DeterministicRng,
) -> Result<Vec<Centroid>, AnalysisError> {
    if k == 0 || k > vectors.len() {
        return Err(AnalysisError::InsufficientData {
            available: vectors.len(),
            requested: k,
        });
    }

    let mut centroids: Vec<Centroid> = Vec::with_capacity(k);

    // First centroid: uniform over the data points
    let first = rng.next_index(vectors.len());
    centroids.push(vectors[first].values);

    while centroids.len() < k {
        // Squared distance from every point to its nearest chosen centroid
        let weights: Vec<f64> = vectors
            .iter()
            .map(|v| nearest_squared_distance(v, &centroids))
            .collect();
        let total: f64 = weights.iter().sum();

        let chosen = if total > 0.0 {
            roulette_pick(&weights, total, rng)
        } else {
            // Every remaining point coincides with a centroid; fall back to
            // a uniform draw so initialization still completes
            rng.next_index(vectors.len())
        };

        centroids.push(vectors[chosen].values);
    }

    Ok(centroids)
}

fn nearest_squared_distance(vector: &FeatureVector, centroids: &[Centroid]) -> f64 {
    centroids
        .iter()
        .map(|c| squared_distance(&vector.values, c))
        .fold(f64::MAX, f64::min)
}

/// Cumulative-sum threshold draw over non-negative weights
fn roulette_pick(weights: &[f64], total: f64, rng: &mut DeterministicRng) -> usize {
    let threshold = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative >= threshold {
            return index;
        }
    }
    weights.len() - 1
}

// ============================================================================
// TESTS
// ============================================================================
