//! Analysis Orchestrator
//!
//! Sequences one clustering run: feature extraction, K-Means++ seeding,
//! Lloyd's iteration, then per-cluster threat assessment, attack
//! classification, and explanation, finishing with the quality metrics and
//! the aggregate threat summary. A single synchronous batch computation:
//! it runs to completion and returns a complete result, or fails with one
//! of the named errors.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cluster::{init, lloyd, metrics, DeterministicRng};
use super::error::AnalysisError;
use super::events::LogEvent;
use super::explain;
use super::features;
use super::result::{AlgorithmMetrics, Cluster, ClusteringResult, ThreatAnalysis};
use super::threat::rules::CAMPAIGN_SIZE_FLOOR;
use super::threat::{self, ClusterStats, ScoringConfig, ThreatLevel};

// ============================================================================
// PARAMETERS
// ============================================================================

/// Per-run parameters supplied by the caller. Accepts the camelCase keys
/// the dashboard sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Desired cluster count; must satisfy 1 <= k <= event count
    pub k: usize,

    #[serde(default = "default_min_cluster_size", alias = "minClusterSize")]
    pub min_cluster_size: usize,

    /// Carried through the interface contract; fixed by the presets
    #[serde(default = "default_similarity_threshold", alias = "similarityThreshold")]
    pub similarity_threshold: f64,

    /// Analysis window in hours, fixed by the presets
    #[serde(default = "default_time_window", alias = "timeWindow")]
    pub time_window_hours: u32,
}

fn default_min_cluster_size() -> usize {
    5
}

fn default_similarity_threshold() -> f64 {
    0.75
}

fn default_time_window() -> u32 {
    72
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            k: 5,
            min_cluster_size: default_min_cluster_size(),
            similarity_threshold: default_similarity_threshold(),
            time_window_hours: default_time_window(),
        }
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Run one clustering analysis with the default scoring configuration.
pub fn run_analysis(
    events: &[LogEvent],
    params: &ClusterParams,
) -> Result<ClusteringResult, AnalysisError> {
    run_analysis_with_config(events, params, &ScoringConfig::default())
}

/// Run one clustering analysis with custom scoring parameters.
pub fn run_analysis_with_config(
    events: &[LogEvent],
    params: &ClusterParams,
    config: &ScoringConfig,
) -> Result<ClusteringResult, AnalysisError> {
    let started = Instant::now();

    // Hard validation happens before any clustering work
    if events.is_empty() {
        return Err(AnalysisError::InsufficientData {
            available: 0,
            requested: params.k,
        });
    }
    if params.k == 0 || params.k > events.len() {
        return Err(AnalysisError::InsufficientData {
            available: events.len(),
            requested: params.k,
        });
    }

    log::info!(
        "starting clustering analysis: {} events, k={}",
        events.len(),
        params.k
    );

    let vectors = features::extract_features(events)?;

    // Fresh generator per run: reproducibility by construction
    let mut rng = DeterministicRng::default();
    let initial = init::kmeans_pp_init(&vectors, params.k, &mut rng)?;
    let outcome = lloyd::run(&vectors, initial, &mut rng);

    // Group member indices by cluster id, preserving input order
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); params.k];
    for (index, &cluster_id) in outcome.assignments.iter().enumerate() {
        members[cluster_id].push(index);
    }

    let mut clusters = Vec::new();
    for (cluster_id, indices) in members.iter().enumerate() {
        if indices.is_empty() {
            continue;
        }

        let cluster_events: Vec<&LogEvent> = indices.iter().map(|&i| &events[i]).collect();
        let stats = ClusterStats::compute(&cluster_events);
        let assessment = threat::assess_with_config(&stats, config);
        let attack_type = threat::classify(&stats);
        let explanation = explain::explain(&stats, attack_type, assessment.level);

        clusters.push(Cluster {
            cluster_id,
            size: stats.size,
            event_ids: cluster_events.iter().map(|e| e.event_id.clone()).collect(),
            threat_level: assessment.level,
            attack_type,
            confidence: assessment.confidence,
            avg_risk_score: stats.avg_risk,
            time_span: stats.time_span_human(),
            geographic_spread: stats.regions.clone(),
            user_targets: stats.users.clone(),
            explanation: explanation.summary,
            risk_factors: explanation.risk_factors,
            score_breakdown: assessment.breakdown,
        });
    }

    let algorithm_metrics = AlgorithmMetrics {
        silhouette_score: metrics::silhouette_score(&vectors, &outcome.assignments, params.k),
        within_cluster_variance: metrics::within_cluster_variance(
            &vectors,
            &outcome.assignments,
            &outcome.centroids,
        ),
        between_cluster_variance: metrics::between_cluster_variance(&outcome.centroids),
        iterations_run: outcome.iterations,
        converged: outcome.converged,
        processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
    };

    let threat_analysis = summarize_threats(&clusters, params);

    log::info!(
        "analysis complete: {} clusters, {} threats, silhouette {:.0}, {:.1} ms",
        clusters.len(),
        threat_analysis.total_threats,
        algorithm_metrics.silhouette_score,
        algorithm_metrics.processing_time_ms
    );

    Ok(ClusteringResult {
        analysis_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        total_events: events.len(),
        clusters,
        metrics: algorithm_metrics,
        threat_analysis,
    })
}

/// Fold the per-cluster annotations into the aggregate summary.
fn summarize_threats(clusters: &[Cluster], params: &ClusterParams) -> ThreatAnalysis {
    let campaign_floor = params.min_cluster_size.max(CAMPAIGN_SIZE_FLOOR);

    let mut origins: BTreeSet<String> = BTreeSet::new();
    for cluster in clusters {
        origins.extend(cluster.geographic_spread.iter().cloned());
    }

    ThreatAnalysis {
        total_threats: clusters
            .iter()
            .filter(|c| c.threat_level >= ThreatLevel::Medium)
            .count(),
        high_risk_clusters: clusters
            .iter()
            .filter(|c| c.threat_level >= ThreatLevel::High)
            .count(),
        attack_campaigns: clusters.iter().filter(|c| c.size >= campaign_floor).count(),
        geographic_origins: origins.into_iter().collect(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::threat::AttackType;
    use chrono::TimeZone;

    fn event(id: &str, name: &str, region: &str, risk: f64, minute: u32) -> LogEvent {
        LogEvent {
            event_id: id.to_string(),
            event_name: name.to_string(),
            source_ip: "198.51.100.10".to_string(),
            user_identity_type: "IAMUser".to_string(),
            user_name: "alice".to_string(),
            aws_region: region.to_string(),
            error_code: String::new(),
            event_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, minute, 0).unwrap()),
            risk_score: risk,
        }
    }

    fn mixed_batch(count: usize) -> Vec<LogEvent> {
        let names = ["DescribeInstances", "GetObject", "ConsoleLogin", "PutMetricData"];
        let regions = ["us-east-1", "eu-west-1"];
        (0..count)
            .map(|i| {
                event(
                    &format!("e{i}"),
                    names[i % names.len()],
                    regions[i % regions.len()],
                    (i % 10) as f64 * 10.0,
                    (i % 60) as u32,
                )
            })
            .collect()
    }

    fn params(k: usize) -> ClusterParams {
        ClusterParams {
            k,
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_property() {
        let events = mixed_batch(40);
        let result = run_analysis(&events, &params(5)).expect("run");

        assert_eq!(result.total_events, 40);
        assert_eq!(result.clustered_events(), 40);

        // Every event id appears in exactly one cluster
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for cluster in &result.clusters {
            for id in &cluster.event_ids {
                assert!(seen.insert(id.as_str()), "event {id} appears twice");
            }
        }
        assert_eq!(seen.len(), 40);
    }

    #[test]
    fn test_determinism_across_runs() {
        let events = mixed_batch(30);
        let first = run_analysis(&events, &params(4)).expect("first");
        let second = run_analysis(&events, &params(4)).expect("second");

        assert_eq!(first.clusters.len(), second.clusters.len());
        for (a, b) in first.clusters.iter().zip(second.clusters.iter()) {
            assert_eq!(a.cluster_id, b.cluster_id);
            assert_eq!(a.event_ids, b.event_ids);
            assert_eq!(a.threat_level, b.threat_level);
            assert_eq!(a.attack_type, b.attack_type);
            assert_eq!(a.explanation, b.explanation);
            assert_eq!(a.risk_factors, b.risk_factors);
        }
        assert_eq!(
            first.metrics.silhouette_score,
            second.metrics.silhouette_score
        );
    }

    #[test]
    fn test_three_events_k_one() {
        let events = vec![
            event("a", "DescribeInstances", "us-east-1", 20.0, 0),
            event("b", "GetObject", "eu-west-1", 25.0, 10),
            event("c", "ListBuckets", "us-east-1", 15.0, 20),
        ];
        let result = run_analysis(&events, &params(1)).expect("run");

        assert_eq!(result.clusters.len(), 1);
        let cluster = &result.clusters[0];
        assert_eq!(cluster.size, 3);
        assert_eq!(
            cluster.geographic_spread,
            vec!["eu-west-1".to_string(), "us-east-1".to_string()]
        );
        assert_eq!(cluster.attack_type, AttackType::NormalActivity);
        // Single cluster: silhouette is exactly zero
        assert_eq!(result.metrics.silhouette_score, 0.0);
    }

    #[test]
    fn test_k_greater_than_n_fails_before_clustering() {
        let events = mixed_batch(3);
        match run_analysis(&events, &params(8)) {
            Err(AnalysisError::InsufficientData {
                available,
                requested,
            }) => {
                assert_eq!(available, 3);
                assert_eq!(requested, 8);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            run_analysis(&[], &params(3)),
            Err(AnalysisError::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn test_identical_timestamps_do_not_error() {
        let events: Vec<LogEvent> = (0..20)
            .map(|i| {
                let mut e = event(&format!("e{i}"), "ConsoleLogin", "us-east-1", 55.0, 30);
                if i < 10 {
                    e.error_code = "AccessDenied".to_string();
                }
                e
            })
            .collect();

        let result = run_analysis(&events, &params(1)).expect("burst batch must not error");
        let cluster = &result.clusters[0];

        assert_eq!(cluster.size, 20);
        assert_eq!(cluster.time_span, "instantaneous");
        // Half the calls failed but that is below the brute-force bar
        assert_ne!(cluster.attack_type, AttackType::BruteForce);
        assert_eq!(cluster.attack_type, AttackType::SuspiciousActivity);
        assert!(cluster
            .risk_factors
            .iter()
            .any(|f| f.contains("single IP")));
    }

    #[test]
    fn test_scores_are_bounded() {
        let events = mixed_batch(50);
        let result = run_analysis(&events, &params(6)).expect("run");

        for cluster in &result.clusters {
            assert!((0.0..=100.0).contains(&cluster.confidence));
            assert!((0.0..=100.0).contains(&cluster.score_breakdown.composite_score));
        }
        assert!((-100.0..=100.0).contains(&result.metrics.silhouette_score));
    }

    #[test]
    fn test_campaign_floor_respects_min_cluster_size() {
        let events = mixed_batch(30);
        let mut p = params(1);
        p.min_cluster_size = 50;
        let result = run_analysis(&events, &p).expect("run");
        // One cluster of 30 events, below the raised floor
        assert_eq!(result.threat_analysis.attack_campaigns, 0);

        p.min_cluster_size = 5;
        let result = run_analysis(&events, &p).expect("run");
        assert_eq!(result.threat_analysis.attack_campaigns, 1);
    }

    #[test]
    fn test_sensitivity_config_changes_levels_not_partition() {
        let events = mixed_batch(30);
        let default_run = run_analysis(&events, &params(3)).expect("default");
        let sensitive_run =
            run_analysis_with_config(&events, &params(3), &ScoringConfig::high_sensitivity())
                .expect("sensitive");

        // Same partition either way
        let ids = |r: &ClusteringResult| -> Vec<Vec<String>> {
            r.clusters.iter().map(|c| c.event_ids.clone()).collect()
        };
        assert_eq!(ids(&default_run), ids(&sensitive_run));

        // Sensitivity can only hold or raise a cluster's level
        for (a, b) in default_run.clusters.iter().zip(sensitive_run.clusters.iter()) {
            assert!(b.threat_level >= a.threat_level);
        }
    }
}
