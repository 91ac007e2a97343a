//! Threat Scoring Rules & Thresholds
//!
//! Every weight, cap, and threshold used by the composite risk scorer, plus
//! the event-name pattern tables shared with the attack classifier. No
//! scoring logic here, only constants and configuration.
//!
//! The numeric values are tuning defaults carried over from the reference
//! model; treat them as configuration, not hard law.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// SIGNAL GROUP WEIGHTS & CAPS
// ============================================================================

/// Weight of the scaled cluster-average upstream risk
pub const BASE_WEIGHT: f64 = 0.45;
/// Cap on the base-risk contribution
pub const BASE_CAP: f64 = 35.0;

/// Weight of the behavioral group (mean of user/IP/geo sub-scores)
pub const BEHAVIORAL_WEIGHT: f64 = 0.35;

/// Weight of the contextual group (operation classes + error rate)
pub const CONTEXTUAL_WEIGHT: f64 = 0.25;
/// Cap on the contextual contribution
pub const CONTEXTUAL_CAP: f64 = 25.0;

/// Weight of the anomaly group (z-score, density, interval variance)
pub const ANOMALY_WEIGHT: f64 = 0.20;

/// Weight of the temporal group (burst density, irregular timing)
pub const TEMPORAL_WEIGHT: f64 = 0.15;
/// Cap on the temporal contribution
pub const TEMPORAL_CAP: f64 = 15.0;

/// Weight of the diversity group (nonlinear unique-count thresholds)
pub const DIVERSITY_WEIGHT: f64 = 0.20;
/// Cap on the diversity contribution
pub const DIVERSITY_CAP: f64 = 20.0;

// ============================================================================
// ANOMALY BASELINE
// ============================================================================

/// Population mean the cluster's average risk is z-scored against
pub const POPULATION_MEAN_RISK: f64 = 50.0;

/// Population standard deviation for the z-score
pub const POPULATION_RISK_STD: f64 = 15.0;

// ============================================================================
// THREAT-LANDSCAPE MULTIPLIER (0.92x - 1.2x)
// ============================================================================

/// Average-risk tiers and the multiplier each applies to the summed score
pub const LANDSCAPE_TIERS: [(f64, f64); 4] = [
    (75.0, 1.2),
    (60.0, 1.1),
    (40.0, 1.0),
    (25.0, 0.96),
];

/// Multiplier below the lowest landscape tier
pub const LANDSCAPE_FLOOR: f64 = 0.92;

// ============================================================================
// CLASSIFICATION THRESHOLDS (before volume adjustment)
// ============================================================================

/// At or above this composite score = CRITICAL
pub const CRITICAL_THRESHOLD: f64 = 85.0;

/// At or above this composite score = HIGH
pub const HIGH_THRESHOLD: f64 = 65.0;

/// At or above this composite score = MEDIUM; below = LOW
pub const MEDIUM_THRESHOLD: f64 = 40.0;

/// Scale of the size-based threshold reduction (ln(1+size) * scale)
pub const VOLUME_ADJUSTMENT_SCALE: f64 = 2.2;

/// Ceiling on the size-based threshold reduction
pub const VOLUME_ADJUSTMENT_MAX: f64 = 12.0;

// ============================================================================
// SUMMARY THRESHOLDS
// ============================================================================

/// A cluster at or above this size counts as an attack campaign
/// (raised by the caller's min_cluster_size when larger)
pub const CAMPAIGN_SIZE_FLOOR: usize = 10;

// ============================================================================
// SCORING CONFIGURATION (for runtime adjustment)
// ============================================================================

/// Tunable scoring parameters. The constants above are the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_weight: f64,
    pub base_cap: f64,
    pub behavioral_weight: f64,
    pub contextual_weight: f64,
    pub contextual_cap: f64,
    pub anomaly_weight: f64,
    pub temporal_weight: f64,
    pub temporal_cap: f64,
    pub diversity_weight: f64,
    pub diversity_cap: f64,
    pub population_mean_risk: f64,
    pub population_risk_std: f64,
    pub critical_threshold: f64,
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub volume_adjustment_scale: f64,
    pub volume_adjustment_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_weight: BASE_WEIGHT,
            base_cap: BASE_CAP,
            behavioral_weight: BEHAVIORAL_WEIGHT,
            contextual_weight: CONTEXTUAL_WEIGHT,
            contextual_cap: CONTEXTUAL_CAP,
            anomaly_weight: ANOMALY_WEIGHT,
            temporal_weight: TEMPORAL_WEIGHT,
            temporal_cap: TEMPORAL_CAP,
            diversity_weight: DIVERSITY_WEIGHT,
            diversity_cap: DIVERSITY_CAP,
            population_mean_risk: POPULATION_MEAN_RISK,
            population_risk_std: POPULATION_RISK_STD,
            critical_threshold: CRITICAL_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            medium_threshold: MEDIUM_THRESHOLD,
            volume_adjustment_scale: VOLUME_ADJUSTMENT_SCALE,
            volume_adjustment_max: VOLUME_ADJUSTMENT_MAX,
        }
    }
}

impl ScoringConfig {
    /// High sensitivity - lower thresholds, more clusters flagged
    pub fn high_sensitivity() -> Self {
        Self {
            critical_threshold: 75.0,
            high_threshold: 55.0,
            medium_threshold: 30.0,
            ..Default::default()
        }
    }

    /// Low sensitivity - higher thresholds, fewer clusters flagged
    pub fn low_sensitivity() -> Self {
        Self {
            critical_threshold: 92.0,
            high_threshold: 75.0,
            medium_threshold: 50.0,
            ..Default::default()
        }
    }

    /// Bounded threshold reduction as a function of cluster size. Cluster
    /// volume is corroborating evidence: more events lower the bar.
    pub fn volume_adjustment(&self, size: usize) -> f64 {
        ((size as f64).ln_1p() * self.volume_adjustment_scale).min(self.volume_adjustment_max)
    }

    /// (critical, high, medium) thresholds adjusted for cluster size
    pub fn dynamic_thresholds(&self, size: usize) -> (f64, f64, f64) {
        let adjustment = self.volume_adjustment(size);
        (
            self.critical_threshold - adjustment,
            self.high_threshold - adjustment,
            self.medium_threshold - adjustment * 0.5,
        )
    }
}

// ============================================================================
// EVENT-NAME PATTERN TABLES
// ============================================================================

/// Destructive operations (delete/terminate class)
pub static DESTRUCTIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Delete|Terminate|Remove|Stop|Disable)").expect("static pattern")
});

/// Administrative / privilege operations
pub static PRIVILEGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(CreateUser|CreateRole|CreateAccessKey|CreateLoginProfile",
        r"|CreatePolicyVersion|SetDefaultPolicyVersion|AttachUserPolicy",
        r"|AttachRolePolicy|AttachGroupPolicy|PutUserPolicy|PutRolePolicy",
        r"|AddUserToGroup|UpdateAssumeRolePolicy)"
    ))
    .expect("static pattern")
});

/// Read-heavy access (enumeration / inspection class)
pub static READ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Get|List|Describe|Head|LookupEvents)").expect("static pattern"));

/// Compute-resource operations (instance/function spin-up class)
pub static RESOURCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(RunInstances|StartInstances|RequestSpotInstances",
        r"|CreateFunction|Invoke|CreateCluster|CreateVolume|CreateStack)"
    ))
    .expect("static pattern")
});

/// Account / credential operations (sign-in and session class)
pub static ACCOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(ConsoleLogin|AssumeRole|GetSessionToken|GetFederationToken",
        r"|SwitchRole|UpdateLoginProfile|ChangePassword)"
    ))
    .expect("static pattern")
});

/// Data access operations (object/secret retrieval class)
pub static DATA_ACCESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(GetObject|CopyObject|ListObjects|GetSecretValue",
        r"|BatchGetItem|Scan|Query|ExportSnapshot|CreateSnapshot)"
    ))
    .expect("static pattern")
});

// ============================================================================
// TESTS
// ============================================================================
