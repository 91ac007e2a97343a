//! Analysis Request Contract
//!
//! The JSON boundary the engine is driven through: a list of log events
//! plus a parameter object (or a preset name resolved by the caller).
//! Parsing is lenient about event fields - missing values become sentinels
//! downstream - but the envelope itself must be well-formed JSON.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::analysis::ClusterParams;
use crate::logic::error::AnalysisError;
use crate::logic::events::LogEvent;

use super::presets;

// ============================================================================
// REQUEST
// ============================================================================

/// One analysis invocation as received from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub events: Vec<LogEvent>,

    /// Explicit parameters; when absent the default preset applies
    #[serde(default)]
    pub params: Option<ClusterParams>,
}

impl AnalysisRequest {
    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The effective parameters for this request: explicit params win,
    /// otherwise the configured default preset.
    pub fn resolved_params(&self) -> ClusterParams {
        if let Some(params) = &self.params {
            return params.clone();
        }
        presets::get_preset(&constants::get_default_preset()).unwrap_or_default()
    }

    /// Surface hard errors before any clustering work, and flag batches
    /// above the interactive soft cap. `params` are the effective
    /// parameters for the run (explicit, preset, or default).
    pub fn precheck(&self, params: &ClusterParams) -> Result<(), AnalysisError> {
        if self.events.is_empty() || params.k == 0 || params.k > self.events.len() {
            return Err(AnalysisError::InsufficientData {
                available: self.events.len(),
                requested: params.k,
            });
        }

        let soft_cap = constants::get_event_soft_cap();
        if self.events.len() > soft_cap {
            log::warn!(
                "batch of {} events exceeds the interactive soft cap of {}",
                self.events.len(),
                soft_cap
            );
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
