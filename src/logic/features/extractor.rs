//! Feature Extraction Engine
//!
//! Converts a batch of log events into normalized feature vectors:
//! min-max scaling for risk score and timestamp against the batch extremes,
//! polynomial string hashing for the categorical fields. Extraction is a
//! pure per-event map and runs in parallel across the batch.

use rayon::prelude::*;

use crate::logic::error::AnalysisError;
use crate::logic::events::LogEvent;

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;

/// Categorical hash buckets. Distinct strings can collide; that collision
/// behavior is part of the encoding contract.
const HASH_BUCKETS: u64 = 1000;

/// Normalized value when a batch dimension is degenerate (min == max)
const DEGENERATE_DEFAULT: f64 = 0.5;

// ============================================================================
// BATCH EXTRACTION
// ============================================================================

/// Extract one feature vector per event, positional-parallel to the input.
///
/// Events missing expected fields are repaired with sentinel values and
/// reported through a warning; they never abort the batch. An empty batch
/// is the only hard failure.
pub fn extract_features(events: &[LogEvent]) -> Result<Vec<FeatureVector>, AnalysisError> {
    if events.is_empty() {
        return Err(AnalysisError::InsufficientData {
            available: 0,
            requested: 1,
        });
    }

    let mut repaired = 0usize;
    for event in events {
        if let Some(report) = event.repair_report() {
            repaired += 1;
            log::warn!("repairing event with neutral values: {}", report);
        }
    }
    if repaired > 0 {
        log::info!("repaired {} of {} events during extraction", repaired, events.len());
    }

    let bounds = BatchBounds::from_events(events);

    let vectors = events
        .par_iter()
        .map(|event| extract_one(event, &bounds))
        .collect();

    Ok(vectors)
}

/// Batch-wide extremes used for min-max scaling
struct BatchBounds {
    risk_min: f64,
    risk_max: f64,
    time_min: i64,
    time_max: i64,
    has_timestamps: bool,
}

impl BatchBounds {
    fn from_events(events: &[LogEvent]) -> Self {
        let mut risk_min = f64::MAX;
        let mut risk_max = f64::MIN;
        for event in events {
            let risk = event.bounded_risk();
            risk_min = risk_min.min(risk);
            risk_max = risk_max.max(risk);
        }

        let mut time_min = i64::MAX;
        let mut time_max = i64::MIN;
        let mut has_timestamps = false;
        for event in events {
            if let Some(millis) = event.epoch_millis() {
                has_timestamps = true;
                time_min = time_min.min(millis);
                time_max = time_max.max(millis);
            }
        }

        Self {
            risk_min,
            risk_max,
            time_min,
            time_max,
            has_timestamps,
        }
    }
}

fn extract_one(event: &LogEvent, bounds: &BatchBounds) -> FeatureVector {
    let mut values = [0.0f64; FEATURE_COUNT];

    values[0] = min_max_scale(event.bounded_risk(), bounds.risk_min, bounds.risk_max);
    values[1] = match event.epoch_millis() {
        Some(millis) if bounds.has_timestamps => {
            min_max_scale(millis as f64, bounds.time_min as f64, bounds.time_max as f64)
        }
        // Missing timestamp reads as the neutral mid-range position
        _ => DEGENERATE_DEFAULT,
    };
    values[2] = hash_feature(event.region());
    values[3] = hash_feature(event.identity_type());
    values[4] = hash_feature(event.error_code_or_sentinel());

    FeatureVector::from_values(values)
}

// ============================================================================
// SCALING & HASHING
// ============================================================================

/// Min-max scale into [0,1]; a degenerate range maps to 0.5.
fn min_max_scale(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return DEGENERATE_DEFAULT;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Polynomial string hash reduced into [0,1).
///
/// h = h*31 + byte (wrapping), then mod 1000 / 1000.
fn hash_feature(value: &str) -> f64 {
    let mut hash: u64 = 0;
    for byte in value.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(u64::from(byte));
    }
    (hash % HASH_BUCKETS) as f64 / HASH_BUCKETS as f64
}

// ============================================================================
// TESTS
// ============================================================================
