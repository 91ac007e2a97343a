//! Threat Analyzer - Composite Risk Scoring
//!
//! Combines seven independently-scored signal groups into one composite
//! value in [0,100], then classifies against dynamic thresholds that drop
//! slightly as cluster size grows. Sub-scores are each on a 0-100 scale
//! before weighting; capped groups keep any single signal from dominating.

use super::rules::{ScoringConfig, LANDSCAPE_FLOOR, LANDSCAPE_TIERS};
use super::stats::ClusterStats;
use super::types::{ScoreBreakdown, ThreatAssessment, ThreatLevel};

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Assess one cluster with the default scoring configuration
pub fn assess(stats: &ClusterStats) -> ThreatAssessment {
    assess_with_config(stats, &ScoringConfig::default())
}

/// Assess one cluster with custom scoring parameters
pub fn assess_with_config(stats: &ClusterStats, config: &ScoringConfig) -> ThreatAssessment {
    let base_contribution = (stats.avg_risk * config.base_weight).min(config.base_cap);
    let behavioral_contribution = behavioral_score(stats) * config.behavioral_weight;
    let contextual_contribution =
        (contextual_score(stats) * config.contextual_weight).min(config.contextual_cap);
    let anomaly_contribution = anomaly_score(stats, config) * config.anomaly_weight;
    let temporal_contribution =
        (temporal_score(stats) * config.temporal_weight).min(config.temporal_cap);
    let diversity_contribution =
        (diversity_score(stats) * config.diversity_weight).min(config.diversity_cap);

    let summed = base_contribution
        + behavioral_contribution
        + contextual_contribution
        + anomaly_contribution
        + temporal_contribution
        + diversity_contribution;

    let landscape_multiplier = landscape_multiplier(stats.avg_risk);
    let composite_score = (summed * landscape_multiplier).clamp(0.0, 100.0);

    let (critical, high, medium) = config.dynamic_thresholds(stats.size);
    let level = if composite_score >= critical {
        ThreatLevel::Critical
    } else if composite_score >= high {
        ThreatLevel::High
    } else if composite_score >= medium {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    };

    let confidence = confidence_score(composite_score, stats.size, (critical, high, medium));

    log::debug!(
        "cluster assessed: composite={:.1} level={} (thresholds {:.1}/{:.1}/{:.1}, size {})",
        composite_score,
        level,
        critical,
        high,
        medium,
        stats.size
    );

    ThreatAssessment {
        level,
        confidence,
        breakdown: ScoreBreakdown {
            base_contribution,
            behavioral_contribution,
            contextual_contribution,
            anomaly_contribution,
            temporal_contribution,
            diversity_contribution,
            landscape_multiplier,
            composite_score,
        },
    }
}

// ============================================================================
// SIGNAL GROUPS (each on a 0-100 scale)
// ============================================================================

/// Mean of the user / source-IP / geographic behavior sub-scores
fn behavioral_score(stats: &ClusterStats) -> f64 {
    (user_behavior_score(stats) + ip_behavior_score(stats) + geo_behavior_score(stats)) / 3.0
}

/// Root activity rate, username diversity, privilege-flavored event names
fn user_behavior_score(stats: &ClusterStats) -> f64 {
    let mut score = stats.root_rate * 50.0;
    score += if stats.unique_users > 10 {
        25.0
    } else {
        stats.unique_users as f64 * 2.0
    };
    score += (stats.privilege_count as f64 * 8.0).min(30.0);
    score.min(100.0)
}

/// IP diversity, error rate, single-source concentration
fn ip_behavior_score(stats: &ClusterStats) -> f64 {
    let mut score = if stats.unique_ips > 15 {
        30.0
    } else {
        stats.unique_ips as f64 * 2.0
    };
    score += stats.error_rate * 40.0;
    if stats.ip_concentration > 0.8 && stats.size >= 10 {
        score += 25.0;
    }
    score.min(100.0)
}

/// Region diversity and single-region concentration
fn geo_behavior_score(stats: &ClusterStats) -> f64 {
    let mut score: f64 = match stats.unique_regions {
        r if r >= 5 => 40.0,
        r if r >= 3 => 25.0,
        2 => 10.0,
        _ => 0.0,
    };
    if stats.unique_regions == 1 && stats.size >= 20 {
        score += 15.0;
    }
    score.min(100.0)
}

/// Operation classes present in the cluster, plus raw error rate
fn contextual_score(stats: &ClusterStats) -> f64 {
    let mut score = 0.0;
    if stats.destructive_count > 0 {
        score += 30.0;
    }
    if stats.privilege_count > 0 {
        score += 25.0;
    }
    if stats.read_rate > 0.6 {
        score += 15.0;
    }
    score += stats.error_rate * 30.0;
    score.min(100.0)
}

/// Z-score versus the population, event-rate density, interval variance,
/// event-type concentration
fn anomaly_score(stats: &ClusterStats, config: &ScoringConfig) -> f64 {
    let z = (stats.avg_risk - config.population_mean_risk) / config.population_risk_std;
    let mut score = (z.abs() * 18.0).min(40.0);
    score += (stats.events_per_hour * 0.5).min(25.0);
    if stats.interarrival_cv > 2.0 {
        score += 20.0;
    }
    if stats.event_type_concentration > 0.8 && stats.size >= 5 {
        score += 15.0;
    }
    score.min(100.0)
}

/// Burst density tiers and irregular timing
fn temporal_score(stats: &ClusterStats) -> f64 {
    let mut score: f64 = if stats.events_per_hour >= 100.0 {
        60.0
    } else if stats.events_per_hour >= 50.0 {
        40.0
    } else if stats.events_per_hour >= 20.0 {
        20.0
    } else {
        0.0
    };
    if stats.interarrival_cv > 2.5 {
        score += 40.0;
    }
    if stats.is_burst && stats.size >= 10 {
        score += 30.0;
    }
    score.min(100.0)
}

/// Nonlinear unique-count thresholds. Both extremes are suspicious: one IP
/// hitting many events is as notable as hundreds of IPs.
fn diversity_score(stats: &ClusterStats) -> f64 {
    let mut score: f64 = 0.0;
    if stats.unique_ips == 1 && stats.size >= 10 {
        score += 40.0;
    }
    if stats.unique_ips > 20 {
        score += 50.0;
    }
    if stats.unique_regions > 5 {
        score += 30.0;
    }
    if stats.unique_users > 10 {
        score += 25.0;
    }
    if stats.unique_users == 1 && stats.size >= 20 {
        score += 15.0;
    }
    if stats.unique_event_types == 1 && stats.size >= 10 {
        score += 20.0;
    }
    if stats.unique_event_types > 15 {
        score += 20.0;
    }
    score.min(100.0)
}

/// Multiplicative adjustment keyed to the cluster's overall average risk
fn landscape_multiplier(avg_risk: f64) -> f64 {
    for (floor, multiplier) in LANDSCAPE_TIERS {
        if avg_risk >= floor {
            return multiplier;
        }
    }
    LANDSCAPE_FLOOR
}

/// Confidence, 0-100: high when the composite sits far from every decision
/// boundary, lower when it is borderline, with a small size bonus.
fn confidence_score(composite: f64, size: usize, thresholds: (f64, f64, f64)) -> f64 {
    let (critical, high, medium) = thresholds;
    let margin = [critical, high, medium]
        .iter()
        .map(|t| (composite - t).abs())
        .fold(f64::MAX, f64::min);

    let base = if margin >= 15.0 {
        85.0
    } else if margin >= 7.0 {
        70.0
    } else {
        55.0
    };

    (base + size.min(20) as f64 * 0.75).min(100.0)
}

// ============================================================================
// TESTS
// ============================================================================
