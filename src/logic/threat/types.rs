//! Threat Types
//!
//! Core types for cluster threat assessment. No logic here, only data
//! structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// THREAT LEVEL
// ============================================================================

/// Threat classification levels, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "CRITICAL")]
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            ThreatLevel::Low => 0,
            ThreatLevel::Medium => 1,
            ThreatLevel::High => 2,
            ThreatLevel::Critical => 3,
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

/// How the composite score was assembled, one entry per signal group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_contribution: f64,
    pub behavioral_contribution: f64,
    pub contextual_contribution: f64,
    pub anomaly_contribution: f64,
    pub temporal_contribution: f64,
    pub diversity_contribution: f64,
    /// Multiplicative threat-landscape adjustment applied to the sum
    pub landscape_multiplier: f64,
    /// Final composite, clamped to [0,100]
    pub composite_score: f64,
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Result of assessing one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub level: ThreatLevel,
    /// Confidence in the assessment, 0-100
    pub confidence: f64,
    pub breakdown: ScoreBreakdown,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(ThreatLevel::Low < ThreatLevel::Medium);
        assert!(ThreatLevel::Medium < ThreatLevel::High);
        assert!(ThreatLevel::High < ThreatLevel::Critical);
    }

    #[test]
    fn test_as_str_matches_backend_vocabulary() {
        assert_eq!(ThreatLevel::Low.as_str(), "LOW");
        assert_eq!(ThreatLevel::Critical.as_str(), "CRITICAL");
    }

    #[test]
    fn test_severity_level_monotone() {
        assert!(ThreatLevel::Critical.severity_level() > ThreatLevel::High.severity_level());
        assert_eq!(ThreatLevel::Low.severity_level(), 0);
    }
}
