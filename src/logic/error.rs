//! Analysis Error Taxonomy
//!
//! Two named errors cover every failure the engine can surface:
//! - `InsufficientData` is hard: raised before any clustering work begins.
//! - `MalformedEvent` is soft: constructed and logged during feature
//!   extraction, then the event is repaired with sentinel values. A single
//!   bad record never aborts the batch.

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors surfaced by a clustering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Fewer input events than requested clusters, or an empty batch.
    /// Fatal to the run; retry with different parameters.
    InsufficientData { available: usize, requested: usize },

    /// An event is missing expected fields. Repaired with neutral values
    /// during extraction; carried here so the repair can be reported.
    MalformedEvent {
        event_id: String,
        missing: Vec<&'static str>,
    },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::InsufficientData {
                available,
                requested,
            } => write!(
                f,
                "insufficient data: {} events available, {} clusters requested",
                available, requested
            ),
            AnalysisError::MalformedEvent { event_id, missing } => write!(
                f,
                "malformed event '{}': missing fields [{}]",
                event_id,
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = AnalysisError::InsufficientData {
            available: 3,
            requested: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 events available"));
        assert!(msg.contains("8 clusters requested"));
    }

    #[test]
    fn test_malformed_event_display() {
        let err = AnalysisError::MalformedEvent {
            event_id: "evt-17".to_string(),
            missing: vec!["aws_region", "event_time"],
        };
        let msg = err.to_string();
        assert!(msg.contains("evt-17"));
        assert!(msg.contains("aws_region"));
    }
}
