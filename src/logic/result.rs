//! Clustering Run Output
//!
//! The result object handed back to the caller: annotated clusters, the
//! algorithm quality metrics, and the aggregate threat summary. Created
//! fresh on every invocation; the engine never persists it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::threat::{AttackType, ScoreBreakdown, ThreatLevel};

// ============================================================================
// CLUSTER
// ============================================================================

/// One behaviorally coherent group of events with its threat annotations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// 0-based id from the clustering engine's index space
    pub cluster_id: usize,
    pub size: usize,
    /// Ids of the member events, in input order
    pub event_ids: Vec<String>,

    pub threat_level: ThreatLevel,
    pub attack_type: AttackType,
    /// Confidence in the assessment, 0-100
    pub confidence: f64,
    pub avg_risk_score: f64,

    /// Human-readable span, e.g. "2h 15m"
    pub time_span: String,
    /// Sorted set of regions seen in the cluster
    pub geographic_spread: Vec<String>,
    /// Sorted set of usernames seen in the cluster
    pub user_targets: Vec<String>,

    pub explanation: String,
    /// Ordered risk factors; empty for quiet clusters
    pub risk_factors: Vec<String>,

    pub score_breakdown: ScoreBreakdown,
}

// ============================================================================
// METRICS
// ============================================================================

/// Quality metrics describing the clustering itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Mean silhouette over eligible points, x100 and rounded.
    /// 0 when fewer than two clusters exist.
    pub silhouette_score: f64,
    pub within_cluster_variance: f64,
    pub between_cluster_variance: f64,
    pub iterations_run: usize,
    /// False when the iteration cap stopped the loop first
    pub converged: bool,
    pub processing_time_ms: f64,
}

// ============================================================================
// THREAT SUMMARY
// ============================================================================

/// Aggregate counts folded over the clusters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatAnalysis {
    /// Clusters rated MEDIUM or above
    pub total_threats: usize,
    /// Clusters rated HIGH or above
    pub high_risk_clusters: usize,
    /// Clusters at or above the campaign size threshold
    pub attack_campaigns: usize,
    /// Union of all clusters' regions, sorted
    pub geographic_origins: Vec<String>,
}

// ============================================================================
// RESULT
// ============================================================================

/// Output of one clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_events: usize,
    pub clusters: Vec<Cluster>,
    pub metrics: AlgorithmMetrics,
    pub threat_analysis: ThreatAnalysis,
}

impl ClusteringResult {
    /// Events accounted for across all clusters (partition check)
    pub fn clustered_events(&self) -> usize {
        self.clusters.iter().map(|c| c.size).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
