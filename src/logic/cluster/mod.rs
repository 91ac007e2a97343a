//! Clustering Engine
//!
//! From-scratch K-Means: seeded deterministic randomness, K-Means++
//! initialization, Lloyd's iteration, and the quality metrics describing
//! how well-separated the result is.
//!
//! ## Structure
//! - `rng`: seeded LCG random source (one instance per run)
//! - `init`: K-Means++ centroid initialization
//! - `lloyd`: assignment/recompute iteration with empty-cluster reseeding
//! - `metrics`: silhouette score and variance metrics

pub mod init;
pub mod lloyd;
pub mod metrics;
pub mod rng;

use crate::logic::features::layout::FEATURE_COUNT;

/// A centroid lives in the same space as the feature vectors
pub type Centroid = [f64; FEATURE_COUNT];

pub use init::kmeans_pp_init;
pub use lloyd::{LloydOutcome, CONVERGENCE_EPSILON, MAX_ITERATIONS};
pub use rng::{DeterministicRng, DEFAULT_SEED};
