//! Parameter Presets
//!
//! Named parameter bundles for the dashboard's analysis modes. Pure
//! configuration: each preset fixes k, the minimum cluster size, the
//! similarity threshold, and the time window together. Not part of the
//! algorithm's contract.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::logic::analysis::ClusterParams;

static PRESETS: Lazy<BTreeMap<&'static str, ClusterParams>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "rapid-analysis",
            ClusterParams {
                k: 3,
                min_cluster_size: 3,
                similarity_threshold: 0.7,
                time_window_hours: 24,
            },
        ),
        (
            "standard-detection",
            ClusterParams {
                k: 5,
                min_cluster_size: 5,
                similarity_threshold: 0.75,
                time_window_hours: 72,
            },
        ),
        (
            "deep-investigation",
            ClusterParams {
                k: 8,
                min_cluster_size: 8,
                similarity_threshold: 0.8,
                time_window_hours: 168,
            },
        ),
        (
            "enterprise-monitoring",
            ClusterParams {
                k: 10,
                min_cluster_size: 10,
                similarity_threshold: 0.85,
                time_window_hours: 720,
            },
        ),
    ])
});

/// Look up a preset by name
pub fn get_preset(name: &str) -> Option<ClusterParams> {
    PRESETS.get(name).cloned()
}

/// All preset names, sorted
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.keys().copied().collect()
}

// ============================================================================
// TESTS
// ============================================================================
