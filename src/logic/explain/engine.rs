//! Explanation Engine
//!
//! Builds the narrative paragraph and the risk-factor list for one cluster
//! from the same statistics the scorer and classifier used, so the text
//! never disagrees with the numbers. Deterministic: same cluster, same
//! output, same order.

use crate::logic::threat::stats::ClusterStats;
use crate::logic::threat::{AttackType, ThreatLevel};

use super::types::Explanation;

// Risk-factor emission thresholds
const ERROR_RATE_FACTOR: f64 = 0.3;
const ROOT_RATE_FACTOR: f64 = 0.1;
const REGION_COUNT_FACTOR: usize = 3;
const IP_COUNT_FACTOR: usize = 5;
const EVENT_RATE_FACTOR: f64 = 60.0;
const AVG_RISK_FACTOR: f64 = 70.0;
const SHORT_SPAN_MS: i64 = 5 * 60 * 1000;

// ============================================================================
// EXPLANATION
// ============================================================================

/// Produce the narrative and risk factors for one cluster.
pub fn explain(stats: &ClusterStats, attack_type: AttackType, level: ThreatLevel) -> Explanation {
    let mut summary = attack_narrative(stats, attack_type);
    summary.push(' ');
    summary.push_str(&closing_sentence(level));

    Explanation {
        summary,
        risk_factors: risk_factors(stats),
    }
}

fn attack_narrative(stats: &ClusterStats, attack_type: AttackType) -> String {
    let n = stats.size;
    let error_pct = stats.error_rate * 100.0;
    let root_pct = stats.root_rate * 100.0;

    match attack_type {
        AttackType::BruteForce => format!(
            "This cluster of {} events matches a brute-force pattern: {:.0}% of calls failed \
             at a rate of {:.0} events/hour.",
            n, error_pct, stats.events_per_hour
        ),
        AttackType::CredentialStuffing => format!(
            "This cluster of {} events resembles credential stuffing: {} usernames were tried \
             from {} source IP(s) with a {:.0}% failure rate.",
            n, stats.unique_users, stats.unique_ips, error_pct
        ),
        AttackType::PrivilegeEscalation => format!(
            "This cluster of {} events shows privilege escalation activity: {} \
             privilege-granting operations, with root credentials on {:.0}% of calls.",
            n, stats.privilege_count, root_pct
        ),
        AttackType::DataExfiltration => format!(
            "This cluster of {} events looks like data exfiltration: {} data-access \
             operations at an average upstream risk of {:.0}.",
            n, stats.data_access_count, stats.avg_risk
        ),
        AttackType::ResourceAbuse => format!(
            "This cluster of {} events indicates resource abuse: {} compute provisioning \
             calls arriving at {:.0} events/hour.",
            n, stats.resource_count, stats.events_per_hour
        ),
        AttackType::DestructiveAttack => format!(
            "This cluster of {} events contains destructive operations: {} delete/terminate \
             calls across {} region(s).",
            n, stats.destructive_count, stats.unique_regions
        ),
        AttackType::Reconnaissance => format!(
            "This cluster of {} events resembles reconnaissance: enumeration calls make up \
             {:.0}% of activity and {:.0}% of them were denied.",
            n,
            stats.read_rate * 100.0,
            error_pct
        ),
        AttackType::AccountTakeover => format!(
            "This cluster of {} events suggests account takeover: sign-in and session \
             activity from {} source IP(s) with a {:.0}% failure rate.",
            n, stats.unique_ips, error_pct
        ),
        AttackType::ApiAbuse => format!(
            "This cluster of {} events indicates API abuse: sustained calling at {:.0} \
             events/hour with {:.0}% errors.",
            n, stats.events_per_hour, error_pct
        ),
        AttackType::GeographicAnomaly => format!(
            "This cluster of {} events is geographically anomalous: activity spans {} \
             regions within {}.",
            n,
            stats.unique_regions,
            stats.time_span_human()
        ),
        AttackType::TimeBasedAnomaly => format!(
            "This cluster of {} events has anomalous timing: {} events effectively \
             simultaneous or wildly irregular in arrival.",
            n, n
        ),
        AttackType::SuspiciousActivity => format!(
            "This cluster of {} events is suspicious: average upstream risk {:.0} with a \
             {:.0}% error rate across {} event type(s).",
            n, stats.avg_risk, error_pct, stats.unique_event_types
        ),
        AttackType::NormalActivity => format!(
            "This cluster of {} events appears to be routine activity: {:.0}% errors, \
             average upstream risk {:.0}, spread over {}.",
            n,
            error_pct,
            stats.avg_risk,
            stats.time_span_human()
        ),
    }
}

fn closing_sentence(level: ThreatLevel) -> String {
    match level {
        ThreatLevel::Critical => {
            "Immediate investigation is required; this cluster is rated CRITICAL.".to_string()
        }
        ThreatLevel::High => {
            "Prompt review is recommended; this cluster is rated HIGH.".to_string()
        }
        ThreatLevel::Medium => {
            "Monitor this activity; the cluster is rated MEDIUM.".to_string()
        }
        ThreatLevel::Low => "No urgent action needed; the cluster is rated LOW.".to_string(),
    }
}

// ============================================================================
// RISK FACTORS
// ============================================================================

/// Ordered list of discrete risk factors; each entry appears only when its
/// threshold is crossed.
pub fn risk_factors(stats: &ClusterStats) -> Vec<String> {
    let mut factors = Vec::new();

    if stats.error_rate > ERROR_RATE_FACTOR {
        factors.push(format!(
            "High error rate: {:.0}% of events failed",
            stats.error_rate * 100.0
        ));
    }
    if stats.root_rate > ROOT_RATE_FACTOR {
        factors.push(format!(
            "Root account used in {:.0}% of events",
            stats.root_rate * 100.0
        ));
    }
    if stats.unique_regions > REGION_COUNT_FACTOR {
        factors.push(format!(
            "Activity spread across {} regions",
            stats.unique_regions
        ));
    }
    if stats.unique_ips > IP_COUNT_FACTOR {
        factors.push(format!(
            "Events originate from {} distinct IP addresses",
            stats.unique_ips
        ));
    }
    if stats.unique_ips == 1 && stats.size >= 10 {
        factors.push(format!(
            "All {} events originate from a single IP address",
            stats.size
        ));
    }
    if stats.is_burst {
        factors.push(format!(
            "Burst activity: {} events share one timestamp",
            stats.size
        ));
    } else if stats.events_per_hour > EVENT_RATE_FACTOR {
        factors.push(format!(
            "High event rate: {:.0} events/hour",
            stats.events_per_hour
        ));
    }
    if stats.avg_risk > AVG_RISK_FACTOR {
        factors.push(format!(
            "High average upstream risk score: {:.0}",
            stats.avg_risk
        ));
    }
    if stats.destructive_count > 0 {
        factors.push(format!(
            "Destructive operations present ({} delete/terminate calls)",
            stats.destructive_count
        ));
    }
    if stats.account_count > 0 {
        factors.push(format!(
            "Account/credential operations present ({} calls)",
            stats.account_count
        ));
    }
    if stats.data_access_count > 0 {
        factors.push(format!(
            "Data access operations present ({} calls)",
            stats.data_access_count
        ));
    }
    if stats.size >= 5 && stats.time_span_ms > 0 && stats.time_span_ms < SHORT_SPAN_MS {
        factors.push(format!(
            "{} events within a short time span ({})",
            stats.size,
            stats.time_span_human()
        ));
    }

    factors
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::LogEvent;
    use chrono::{TimeZone, Utc};

    fn burst_cluster() -> ClusterStats {
        let events: Vec<LogEvent> = (0..20)
            .map(|i| LogEvent {
                event_id: format!("e{i}"),
                event_name: "ConsoleLogin".to_string(),
                source_ip: "203.0.113.5".to_string(),
                user_identity_type: "IAMUser".to_string(),
                user_name: "alice".to_string(),
                aws_region: "us-east-1".to_string(),
                error_code: if i < 10 {
                    "AccessDenied".to_string()
                } else {
                    String::new()
                },
                event_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap()),
                risk_score: 55.0,
            })
            .collect();
        let refs: Vec<&LogEvent> = events.iter().collect();
        ClusterStats::compute(&refs)
    }

    #[test]
    fn test_explanation_mentions_the_numbers() {
        let stats = burst_cluster();
        let explanation = explain(&stats, AttackType::SuspiciousActivity, ThreatLevel::High);
        assert!(explanation.summary.contains("20 events"));
        assert!(explanation.summary.contains("50%"));
        assert!(explanation.summary.contains("rated HIGH"));
    }

    #[test]
    fn test_risk_factors_for_burst_cluster() {
        let stats = burst_cluster();
        let factors = risk_factors(&stats);

        assert!(factors.iter().any(|f| f.contains("error rate")));
        assert!(factors.iter().any(|f| f.contains("single IP")));
        assert!(factors.iter().any(|f| f.contains("Burst activity")));
        assert!(factors.iter().any(|f| f.contains("Account/credential")));
        // Not triggered: one region, risk 55, no destructive calls
        assert!(!factors.iter().any(|f| f.contains("regions")));
        assert!(!factors.iter().any(|f| f.contains("Destructive")));
    }

    #[test]
    fn test_quiet_cluster_has_no_factors() {
        let events: Vec<LogEvent> = (0..3)
            .map(|i| LogEvent {
                event_id: format!("e{i}"),
                event_name: "PutMetricData".to_string(),
                source_ip: format!("10.0.0.{i}"),
                user_identity_type: "IAMUser".to_string(),
                user_name: "bot".to_string(),
                aws_region: "us-east-1".to_string(),
                error_code: String::new(),
                event_time: Some(
                    Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap()
                        + chrono::Duration::hours(i),
                ),
                risk_score: 12.0,
            })
            .collect();
        let refs: Vec<&LogEvent> = events.iter().collect();
        let stats = ClusterStats::compute(&refs);

        assert!(risk_factors(&stats).is_empty());
    }

    #[test]
    fn test_explanation_is_deterministic() {
        let stats = burst_cluster();
        let a = explain(&stats, AttackType::SuspiciousActivity, ThreatLevel::Medium);
        let b = explain(&stats, AttackType::SuspiciousActivity, ThreatLevel::Medium);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.risk_factors, b.risk_factors);
    }

    #[test]
    fn test_every_attack_type_has_a_narrative() {
        let stats = burst_cluster();
        for attack_type in [
            AttackType::BruteForce,
            AttackType::CredentialStuffing,
            AttackType::PrivilegeEscalation,
            AttackType::DataExfiltration,
            AttackType::ResourceAbuse,
            AttackType::DestructiveAttack,
            AttackType::Reconnaissance,
            AttackType::AccountTakeover,
            AttackType::ApiAbuse,
            AttackType::GeographicAnomaly,
            AttackType::TimeBasedAnomaly,
            AttackType::SuspiciousActivity,
            AttackType::NormalActivity,
        ] {
            let explanation = explain(&stats, attack_type, ThreatLevel::Low);
            assert!(!explanation.summary.is_empty());
            assert!(explanation.summary.contains("rated LOW"));
        }
    }
}
