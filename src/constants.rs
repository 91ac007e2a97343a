//! Central Configuration Constants
//!
//! Single source of truth for app-level defaults. Engine tuning lives in
//! `logic::threat::rules`; this file only carries the operational knobs.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "CSPM Cluster Analysis Core";

/// Default preset applied when a request carries no parameters
pub const DEFAULT_PRESET: &str = "standard-detection";

/// Soft cap on events per interactive run; larger batches still run but
/// are flagged in the log
pub const DEFAULT_EVENT_SOFT_CAP: usize = 1000;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the event soft cap from environment or use default
pub fn get_event_soft_cap() -> usize {
    std::env::var("CLUSTER_EVENT_SOFT_CAP")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EVENT_SOFT_CAP)
}

/// Get the default preset name from environment or use default
pub fn get_default_preset() -> String {
    std::env::var("CLUSTER_DEFAULT_PRESET").unwrap_or_else(|_| DEFAULT_PRESET.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_PRESET, "standard-detection");
        assert!(DEFAULT_EVENT_SOFT_CAP >= 100);
    }
}
