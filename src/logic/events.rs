//! Audit Log Events
//!
//! `LogEvent` is one normalized security-relevant action from the cloud
//! audit trail. Events arrive pre-scored by the upstream model ensemble;
//! the engine reads them and never mutates them.
//!
//! Field aliases accept the CloudTrail-flavored JSON keys the log store
//! emits (`eventID`, `sourceIPAddress`, `awsRegion`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;

/// Sentinel region/identity for events missing the field
pub const UNKNOWN_VALUE: &str = "unknown";

/// Error-code value meaning the call succeeded
pub const NO_ERROR: &str = "NoError";

// ============================================================================
// LOG EVENT
// ============================================================================

/// One security-relevant action. Immutable; owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default, alias = "eventID")]
    pub event_id: String,

    #[serde(default, alias = "eventName")]
    pub event_name: String,

    #[serde(default, alias = "sourceIPAddress")]
    pub source_ip: String,

    /// Root / IAMUser / AssumedRole / ...
    #[serde(default, alias = "userIdentitytype", alias = "userIdentityType")]
    pub user_identity_type: String,

    #[serde(default, alias = "userIdentityuserName", alias = "userName")]
    pub user_name: String,

    #[serde(default, alias = "awsRegion")]
    pub aws_region: String,

    /// Empty or "NoError" means the call succeeded
    #[serde(default, alias = "errorCode")]
    pub error_code: String,

    #[serde(default, alias = "eventTime")]
    pub event_time: Option<DateTime<Utc>>,

    /// Pre-computed upstream risk score in [0,100]
    #[serde(default, alias = "riskScore")]
    pub risk_score: f64,
}

impl LogEvent {
    /// Fields expected on a complete record that are absent here.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.event_name.is_empty() {
            missing.push("event_name");
        }
        if self.source_ip.is_empty() {
            missing.push("source_ip");
        }
        if self.user_identity_type.is_empty() {
            missing.push("user_identity_type");
        }
        if self.user_name.is_empty() {
            missing.push("user_name");
        }
        if self.aws_region.is_empty() {
            missing.push("aws_region");
        }
        if self.event_time.is_none() {
            missing.push("event_time");
        }
        missing
    }

    /// Soft repair report. `None` when the record is complete.
    pub fn repair_report(&self) -> Option<AnalysisError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            None
        } else {
            Some(AnalysisError::MalformedEvent {
                event_id: if self.event_id.is_empty() {
                    "<no id>".to_string()
                } else {
                    self.event_id.clone()
                },
                missing,
            })
        }
    }

    // ------------------------------------------------------------------
    // Sentinel accessors. Missing fields read as neutral values so one
    // malformed record cannot abort the batch.
    // ------------------------------------------------------------------

    pub fn region(&self) -> &str {
        if self.aws_region.is_empty() {
            UNKNOWN_VALUE
        } else {
            &self.aws_region
        }
    }

    pub fn identity_type(&self) -> &str {
        if self.user_identity_type.is_empty() {
            UNKNOWN_VALUE
        } else {
            &self.user_identity_type
        }
    }

    pub fn username(&self) -> &str {
        if self.user_name.is_empty() {
            UNKNOWN_VALUE
        } else {
            &self.user_name
        }
    }

    pub fn ip(&self) -> &str {
        if self.source_ip.is_empty() {
            UNKNOWN_VALUE
        } else {
            &self.source_ip
        }
    }

    pub fn error_code_or_sentinel(&self) -> &str {
        if self.error_code.is_empty() {
            NO_ERROR
        } else {
            &self.error_code
        }
    }

    /// Did the call fail?
    pub fn is_error(&self) -> bool {
        !self.error_code.is_empty() && self.error_code != NO_ERROR
    }

    /// Was the call made by the root account?
    pub fn is_root(&self) -> bool {
        self.user_identity_type == "Root"
    }

    /// Upstream risk clamped into its documented range.
    pub fn bounded_risk(&self) -> f64 {
        self.risk_score.clamp(0.0, 100.0)
    }

    /// Timestamp as epoch milliseconds, when present.
    pub fn epoch_millis(&self) -> Option<i64> {
        self.event_time.map(|t| t.timestamp_millis())
    }
}

// ============================================================================
// TESTS
// ============================================================================
