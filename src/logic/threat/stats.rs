//! Cluster Summary Statistics
//!
//! `ClusterStats` is computed once per cluster and shared by the threat
//! analyzer, the attack classifier, and the explanation generator, so all
//! three reason from the same numbers.
//!
//! The events-per-hour computation special-cases a zero time span (all
//! events share one timestamp): the raw event count is used as a burst-size
//! indicator instead of dividing by zero.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::events::LogEvent;

use super::rules::{
    ACCOUNT_PATTERN, DATA_ACCESS_PATTERN, DESTRUCTIVE_PATTERN, PRIVILEGE_PATTERN, READ_PATTERN,
    RESOURCE_PATTERN,
};

// ============================================================================
// CLUSTER STATS
// ============================================================================

/// Statistical signature of one cluster
#[derive(Debug, Clone, Serialize)]
pub struct ClusterStats {
    pub size: usize,
    pub avg_risk: f64,

    pub error_count: usize,
    pub error_rate: f64,
    pub root_count: usize,
    pub root_rate: f64,

    pub unique_ips: usize,
    pub unique_regions: usize,
    pub unique_users: usize,
    pub unique_event_types: usize,

    /// Share of events carried by the busiest source IP
    pub ip_concentration: f64,
    /// Share of events carried by the most frequent event name
    pub event_type_concentration: f64,

    pub destructive_count: usize,
    pub destructive_rate: f64,
    pub privilege_count: usize,
    pub privilege_rate: f64,
    pub read_count: usize,
    pub read_rate: f64,
    pub resource_count: usize,
    pub resource_rate: f64,
    pub account_count: usize,
    pub account_rate: f64,
    pub data_access_count: usize,
    pub data_access_rate: f64,

    pub first_event: Option<DateTime<Utc>>,
    pub last_event: Option<DateTime<Utc>>,
    pub time_span_ms: i64,
    pub time_span_hours: f64,

    /// All events share one timestamp (and there is more than one)
    pub is_burst: bool,
    /// Events per hour; equals the raw event count when the span is zero
    pub events_per_hour: f64,

    pub interarrival_mean_ms: f64,
    /// Coefficient of variation of inter-arrival intervals (std / mean)
    pub interarrival_cv: f64,

    /// Sorted unique regions (geographic spread)
    pub regions: Vec<String>,
    /// Sorted unique usernames (user targets)
    pub users: Vec<String>,
}

impl ClusterStats {
    /// Summarize the events of one cluster. `events` must be non-empty.
    pub fn compute(events: &[&LogEvent]) -> Self {
        let size = events.len();
        let n = size as f64;

        let avg_risk = events.iter().map(|e| e.bounded_risk()).sum::<f64>() / n;

        let error_count = events.iter().filter(|e| e.is_error()).count();
        let root_count = events.iter().filter(|e| e.is_root()).count();

        let mut ip_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut regions: BTreeSet<&str> = BTreeSet::new();
        let mut users: BTreeSet<&str> = BTreeSet::new();

        for event in events {
            *ip_counts.entry(event.ip()).or_insert(0) += 1;
            *name_counts.entry(event.event_name.as_str()).or_insert(0) += 1;
            regions.insert(event.region());
            users.insert(event.username());
        }

        let max_ip = ip_counts.values().copied().max().unwrap_or(0);
        let max_name = name_counts.values().copied().max().unwrap_or(0);

        let destructive_count = count_matching(events, |name| DESTRUCTIVE_PATTERN.is_match(name));
        let privilege_count = count_matching(events, |name| PRIVILEGE_PATTERN.is_match(name));
        let read_count = count_matching(events, |name| READ_PATTERN.is_match(name));
        let resource_count = count_matching(events, |name| RESOURCE_PATTERN.is_match(name));
        let account_count = count_matching(events, |name| ACCOUNT_PATTERN.is_match(name));
        let data_access_count = count_matching(events, |name| DATA_ACCESS_PATTERN.is_match(name));

        let mut timestamps: Vec<i64> = events.iter().filter_map(|e| e.epoch_millis()).collect();
        timestamps.sort_unstable();

        let (first_event, last_event) = (
            timestamps.first().and_then(|&ms| DateTime::from_timestamp_millis(ms)),
            timestamps.last().and_then(|&ms| DateTime::from_timestamp_millis(ms)),
        );

        let time_span_ms = match (timestamps.first(), timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        };
        let time_span_hours = time_span_ms as f64 / 3_600_000.0;

        let is_burst = size > 1 && time_span_ms == 0;
        let events_per_hour = if time_span_ms == 0 {
            // Burst convention: the count itself is the signal
            n
        } else {
            n / time_span_hours
        };

        let (interarrival_mean_ms, interarrival_cv) = interarrival_stats(&timestamps);

        Self {
            size,
            avg_risk,
            error_count,
            error_rate: error_count as f64 / n,
            root_count,
            root_rate: root_count as f64 / n,
            unique_ips: ip_counts.len(),
            unique_regions: regions.len(),
            unique_users: users.len(),
            unique_event_types: name_counts.len(),
            ip_concentration: max_ip as f64 / n,
            event_type_concentration: max_name as f64 / n,
            destructive_count,
            destructive_rate: destructive_count as f64 / n,
            privilege_count,
            privilege_rate: privilege_count as f64 / n,
            read_count,
            read_rate: read_count as f64 / n,
            resource_count,
            resource_rate: resource_count as f64 / n,
            account_count,
            account_rate: account_count as f64 / n,
            data_access_count,
            data_access_rate: data_access_count as f64 / n,
            first_event,
            last_event,
            time_span_ms,
            time_span_hours,
            is_burst,
            events_per_hour,
            interarrival_mean_ms,
            interarrival_cv,
            regions: regions.into_iter().map(String::from).collect(),
            users: users.into_iter().map(String::from).collect(),
        }
    }

    /// Human-readable span, e.g. "2h 15m", "45s", "instantaneous"
    pub fn time_span_human(&self) -> String {
        format_time_span(self.time_span_ms)
    }
}

fn count_matching(events: &[&LogEvent], matcher: impl Fn(&str) -> bool) -> usize {
    events.iter().filter(|e| matcher(&e.event_name)).count()
}

/// (mean interval ms, coefficient of variation) over sorted timestamps.
/// Degenerate inputs (fewer than two timestamps, zero mean interval)
/// yield zeros instead of NaN.
fn interarrival_stats(sorted_timestamps: &[i64]) -> (f64, f64) {
    if sorted_timestamps.len() < 2 {
        return (0.0, 0.0);
    }

    let intervals: Vec<f64> = sorted_timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64)
        .collect();
    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
    if mean <= 0.0 {
        return (0.0, 0.0);
    }

    let variance = intervals
        .iter()
        .map(|interval| (interval - mean) * (interval - mean))
        .sum::<f64>()
        / intervals.len() as f64;

    (mean, variance.sqrt() / mean)
}

/// Format a millisecond span for display
pub fn format_time_span(span_ms: i64) -> String {
    if span_ms <= 0 {
        return "instantaneous".to_string();
    }

    let total_seconds = span_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds.max(1))
    }
}

// ============================================================================
// TESTS
// ============================================================================
