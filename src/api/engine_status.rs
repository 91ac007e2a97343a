//! Engine Status Registry
//!
//! Process-wide record of completed runs for status reporting. The engine
//! itself stays stateless per run; this registry only observes results.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::features::layout::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::result::ClusteringResult;

// ============================================================================
// STATE
// ============================================================================

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

#[derive(Default)]
struct Registry {
    runs_completed: u64,
    last_run: Option<LastRunSummary>,
}

// ============================================================================
// STATUS TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,

    pub runs_completed: u64,
    pub last_run: Option<LastRunSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastRunSummary {
    pub analysis_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub total_events: usize,
    pub clusters: usize,
    pub high_risk_clusters: usize,
    pub silhouette_score: f64,
    pub processing_time_ms: f64,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Record one completed run
pub fn record_run(result: &ClusteringResult) {
    let mut registry = REGISTRY.write();
    registry.runs_completed += 1;
    registry.last_run = Some(LastRunSummary {
        analysis_id: result.analysis_id,
        completed_at: result.generated_at,
        total_events: result.total_events,
        clusters: result.clusters.len(),
        high_risk_clusters: result.threat_analysis.high_risk_clusters,
        silhouette_score: result.metrics.silhouette_score,
        processing_time_ms: result.metrics.processing_time_ms,
    });
}

/// Current status snapshot
pub fn snapshot() -> EngineStatus {
    let registry = REGISTRY.read();
    EngineStatus {
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        feature_count: FEATURE_COUNT,
        runs_completed: registry.runs_completed,
        last_run: registry.last_run.clone(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::analysis::{run_analysis, ClusterParams};
    use crate::logic::events::LogEvent;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_reports_layout() {
        let status = snapshot();
        assert_eq!(status.feature_version, FEATURE_VERSION);
        assert_eq!(status.feature_count, FEATURE_COUNT);
        assert_eq!(status.layout_hash, layout_hash());
    }

    #[test]
    fn test_record_run_updates_counters() {
        let events: Vec<LogEvent> = (0..4)
            .map(|i| LogEvent {
                event_id: format!("e{i}"),
                event_name: "GetObject".to_string(),
                source_ip: format!("10.1.0.{i}"),
                user_identity_type: "IAMUser".to_string(),
                user_name: "alice".to_string(),
                aws_region: "us-east-1".to_string(),
                error_code: String::new(),
                event_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, i, 0).unwrap()),
                risk_score: 20.0,
            })
            .collect();

        let result = run_analysis(
            &events,
            &ClusterParams {
                k: 2,
                ..Default::default()
            },
        )
        .expect("run");

        let before = snapshot().runs_completed;
        record_run(&result);
        let status = snapshot();

        assert_eq!(status.runs_completed, before + 1);
        let last = status.last_run.expect("last run recorded");
        assert_eq!(last.total_events, 4);
        assert_eq!(last.analysis_id, result.analysis_id);
    }
}
