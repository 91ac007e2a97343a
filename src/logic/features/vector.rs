//! Feature Vector - Clustering-space representation of one event
//!
//! Versioned feature vector with layout validation. Vectors are
//! positional-parallel to the input event list: same index, same event.

use serde::{Deserialize, Serialize};

use super::layout::{layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_VERSION};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Feature vector with layout metadata.
///
/// Invariant: every component lies in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a new zeroed feature vector with current version
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Squared Euclidean distance to a raw point in the same space
    pub fn squared_distance(&self, other: &[f64; FEATURE_COUNT]) -> f64 {
        squared_distance(&self.values, other)
    }

    /// Euclidean distance to a raw point in the same space
    pub fn distance(&self, other: &[f64; FEATURE_COUNT]) -> f64 {
        self.squared_distance(other).sqrt()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// DISTANCE HELPERS
// ============================================================================

/// Squared Euclidean distance between two points in feature space
pub fn squared_distance(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// Euclidean distance between two points in feature space
pub fn distance(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    squared_distance(a, b).sqrt()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_new() {
        let vector = FeatureVector::new();
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert_eq!(vector.values.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_vector_validation() {
        let vector = FeatureVector::new();
        assert!(vector.validate().is_ok());

        let stale = FeatureVector {
            version: FEATURE_VERSION + 1,
            ..FeatureVector::new()
        };
        assert!(stale.validate().is_err());
    }

    #[test]
    fn test_get_by_name() {
        let vector = FeatureVector::from_values([0.5, 0.25, 0.1, 0.2, 0.3]);
        assert_eq!(vector.get_by_name("risk_score_norm"), Some(0.5));
        assert_eq!(vector.get_by_name("time_position"), Some(0.25));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_distance_is_euclidean() {
        let a = FeatureVector::from_values([0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = [3.0, 4.0, 0.0, 0.0, 0.0];
        assert!((a.squared_distance(&b) - 25.0).abs() < 1e-12);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = [0.1, 0.9, 0.4, 0.2, 0.7];
        let b = [0.8, 0.3, 0.5, 0.6, 0.1];
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-12);
    }
}
