//! Threat Module
//!
//! Per-cluster risk assessment. This is the core decision step: the
//! composite scorer assigns LOW/MEDIUM/HIGH/CRITICAL and the decision list
//! names the probable attack type.
//!
//! ## Structure
//! - `types`: Core types (ThreatLevel, ScoreBreakdown, ThreatAssessment)
//! - `stats`: Per-cluster summary statistics shared by all consumers
//! - `rules`: Weights, caps, thresholds, and event-name pattern tables
//! - `analyzer`: Composite scoring logic
//! - `attack`: Attack-type decision list

// Allow unused - some exports for future use
#![allow(unused)]

pub mod analyzer;
pub mod attack;
pub mod rules;
pub mod stats;
pub mod types;

// Re-export main types for convenience
pub use analyzer::{assess, assess_with_config};
pub use attack::{classify, AttackType};
pub use rules::ScoringConfig;
pub use stats::ClusterStats;
pub use types::{ScoreBreakdown, ThreatAssessment, ThreatLevel};
