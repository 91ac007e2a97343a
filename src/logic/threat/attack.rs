//! Attack Classifier
//!
//! First-match-wins decision list over a cluster's statistical signature.
//! Rules are an ordered slice of named (predicate, label) pairs so the
//! priority order stays explicit and every rule is testable in isolation.
//! Falls through to Normal Activity when nothing matches.

use serde::{Deserialize, Serialize};

use super::stats::ClusterStats;

// ============================================================================
// ATTACK TYPES
// ============================================================================

/// Fixed catalog of attack-type labels, in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackType {
    #[serde(rename = "Brute Force Attack")]
    BruteForce,
    #[serde(rename = "Credential Stuffing")]
    CredentialStuffing,
    #[serde(rename = "Privilege Escalation")]
    PrivilegeEscalation,
    #[serde(rename = "Data Exfiltration")]
    DataExfiltration,
    #[serde(rename = "Resource Abuse")]
    ResourceAbuse,
    #[serde(rename = "Destructive Attack")]
    DestructiveAttack,
    #[serde(rename = "Reconnaissance")]
    Reconnaissance,
    #[serde(rename = "Account Takeover")]
    AccountTakeover,
    #[serde(rename = "API Abuse")]
    ApiAbuse,
    #[serde(rename = "Geographic Anomaly")]
    GeographicAnomaly,
    #[serde(rename = "Time-based Anomaly")]
    TimeBasedAnomaly,
    #[serde(rename = "Suspicious Activity")]
    SuspiciousActivity,
    #[serde(rename = "Normal Activity")]
    NormalActivity,
}

impl AttackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::BruteForce => "Brute Force Attack",
            AttackType::CredentialStuffing => "Credential Stuffing",
            AttackType::PrivilegeEscalation => "Privilege Escalation",
            AttackType::DataExfiltration => "Data Exfiltration",
            AttackType::ResourceAbuse => "Resource Abuse",
            AttackType::DestructiveAttack => "Destructive Attack",
            AttackType::Reconnaissance => "Reconnaissance",
            AttackType::AccountTakeover => "Account Takeover",
            AttackType::ApiAbuse => "API Abuse",
            AttackType::GeographicAnomaly => "Geographic Anomaly",
            AttackType::TimeBasedAnomaly => "Time-based Anomaly",
            AttackType::SuspiciousActivity => "Suspicious Activity",
            AttackType::NormalActivity => "Normal Activity",
        }
    }
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DECISION LIST
// ============================================================================

/// One classification rule: a named predicate and the label it assigns
pub struct AttackRule {
    pub name: &'static str,
    pub label: AttackType,
    pub predicate: fn(&ClusterStats) -> bool,
}

/// The ordered rule chain. First satisfied rule wins.
pub static ATTACK_RULES: &[AttackRule] = &[
    AttackRule {
        name: "brute_force",
        label: AttackType::BruteForce,
        predicate: is_brute_force,
    },
    AttackRule {
        name: "credential_stuffing",
        label: AttackType::CredentialStuffing,
        predicate: is_credential_stuffing,
    },
    AttackRule {
        name: "privilege_escalation",
        label: AttackType::PrivilegeEscalation,
        predicate: is_privilege_escalation,
    },
    AttackRule {
        name: "data_exfiltration",
        label: AttackType::DataExfiltration,
        predicate: is_data_exfiltration,
    },
    AttackRule {
        name: "resource_abuse",
        label: AttackType::ResourceAbuse,
        predicate: is_resource_abuse,
    },
    AttackRule {
        name: "destructive_attack",
        label: AttackType::DestructiveAttack,
        predicate: is_destructive_attack,
    },
    AttackRule {
        name: "reconnaissance",
        label: AttackType::Reconnaissance,
        predicate: is_reconnaissance,
    },
    AttackRule {
        name: "account_takeover",
        label: AttackType::AccountTakeover,
        predicate: is_account_takeover,
    },
    AttackRule {
        name: "api_abuse",
        label: AttackType::ApiAbuse,
        predicate: is_api_abuse,
    },
    AttackRule {
        name: "geographic_anomaly",
        label: AttackType::GeographicAnomaly,
        predicate: is_geographic_anomaly,
    },
    AttackRule {
        name: "time_based_anomaly",
        label: AttackType::TimeBasedAnomaly,
        predicate: is_time_based_anomaly,
    },
    AttackRule {
        name: "suspicious_activity",
        label: AttackType::SuspiciousActivity,
        predicate: is_suspicious_activity,
    },
];

/// Classify a cluster from its statistical signature.
pub fn classify(stats: &ClusterStats) -> AttackType {
    for rule in ATTACK_RULES {
        if (rule.predicate)(stats) {
            return rule.label;
        }
    }
    AttackType::NormalActivity
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Overwhelmingly failed calls arriving fast
fn is_brute_force(s: &ClusterStats) -> bool {
    s.error_rate > 0.8 && s.events_per_hour > 30.0
}

/// Many usernames tried from few sources, mostly failing
fn is_credential_stuffing(s: &ClusterStats) -> bool {
    s.error_rate > 0.6 && s.unique_users >= 5 && s.unique_ips <= 3
}

/// Privilege-granting operations dominate, or root drives them
fn is_privilege_escalation(s: &ClusterStats) -> bool {
    s.privilege_rate > 0.3 || (s.root_rate > 0.5 && s.privilege_count > 0)
}

/// High-risk data retrieval
fn is_data_exfiltration(s: &ClusterStats) -> bool {
    s.data_access_rate > 0.5 && s.avg_risk > 60.0
}

/// Compute spin-up at an unusual clip
fn is_resource_abuse(s: &ClusterStats) -> bool {
    s.resource_rate > 0.4 && s.events_per_hour > 20.0
}

/// Delete/terminate operations form a meaningful share
fn is_destructive_attack(s: &ClusterStats) -> bool {
    s.destructive_rate > 0.3
}

/// Enumeration that keeps hitting authorization walls
fn is_reconnaissance(s: &ClusterStats) -> bool {
    s.read_rate > 0.7 && s.error_rate > 0.25
}

/// Sign-in/session activity from scattered sources or with heavy failures
fn is_account_takeover(s: &ClusterStats) -> bool {
    s.account_rate > 0.3 && (s.unique_ips > 3 || s.error_rate > 0.5)
}

/// Sustained high-volume calling with elevated failures
fn is_api_abuse(s: &ClusterStats) -> bool {
    s.events_per_hour > 100.0 && s.error_rate > 0.3 && s.time_span_hours > 0.1
}

/// Activity scattered across many regions
fn is_geographic_anomaly(s: &ClusterStats) -> bool {
    s.unique_regions > 4
}

/// A large single-instant burst, or wildly irregular inter-arrival timing
fn is_time_based_anomaly(s: &ClusterStats) -> bool {
    (s.is_burst && s.size >= 50) || s.interarrival_cv > 3.0
}

/// Elevated risk or failure rate without a more specific signature
fn is_suspicious_activity(s: &ClusterStats) -> bool {
    s.avg_risk > 70.0 || s.error_rate > 0.4
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::LogEvent;
    use chrono::{TimeZone, Utc};

    struct EventSpec {
        name: &'static str,
        ip_pool: usize,
        user_pool: usize,
        region_pool: usize,
        error_rate_pct: usize,
        risk: f64,
        spread_seconds: i64,
    }

    impl Default for EventSpec {
        fn default() -> Self {
            Self {
                name: "DescribeInstances",
                ip_pool: 2,
                user_pool: 1,
                region_pool: 1,
                error_rate_pct: 0,
                risk: 30.0,
                spread_seconds: 3600,
            }
        }
    }

    fn build(count: usize, spec: EventSpec) -> ClusterStats {
        let regions = ["us-east-1", "eu-west-1", "ap-south-1", "us-west-2", "sa-east-1", "eu-north-1"];
        let events: Vec<LogEvent> = (0..count)
            .map(|i| LogEvent {
                event_id: format!("e{i}"),
                event_name: spec.name.to_string(),
                source_ip: format!("203.0.113.{}", i % spec.ip_pool.max(1)),
                user_identity_type: "IAMUser".to_string(),
                user_name: format!("user{}", i % spec.user_pool.max(1)),
                aws_region: regions[i % spec.region_pool.max(1).min(regions.len())].to_string(),
                error_code: if spec.error_rate_pct > 0 && (i * 100 / count) < spec.error_rate_pct {
                    "AccessDenied".to_string()
                } else {
                    String::new()
                },
                event_time: Some(
                    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
                        + chrono::Duration::seconds(i as i64 * spec.spread_seconds / count as i64),
                ),
                risk_score: spec.risk,
            })
            .collect();
        let refs: Vec<&LogEvent> = events.iter().collect();
        ClusterStats::compute(&refs)
    }

    #[test]
    fn test_rule_order_matches_catalog() {
        let labels: Vec<AttackType> = ATTACK_RULES.iter().map(|r| r.label).collect();
        assert_eq!(labels[0], AttackType::BruteForce);
        assert_eq!(labels[labels.len() - 1], AttackType::SuspiciousActivity);
        assert_eq!(labels.len(), 12); // Normal Activity is the fallthrough
    }

    #[test]
    fn test_brute_force_rule() {
        // 30 logins in 30 minutes, 90% failing
        let stats = build(
            30,
            EventSpec {
                name: "ConsoleLogin",
                error_rate_pct: 90,
                spread_seconds: 1800,
                ..Default::default()
            },
        );
        assert!(is_brute_force(&stats));
        assert_eq!(classify(&stats), AttackType::BruteForce);
    }

    #[test]
    fn test_half_error_burst_is_not_brute_force() {
        // 20 events, one IP, half failing, all in one instant: not enough
        // failures for brute force.
        let stats = build(
            20,
            EventSpec {
                name: "ConsoleLogin",
                ip_pool: 1,
                error_rate_pct: 50,
                risk: 55.0,
                spread_seconds: 0,
                ..Default::default()
            },
        );
        assert!((stats.error_rate - 0.5).abs() < 1e-12);
        assert_eq!(stats.unique_ips, 1);
        assert!(stats.is_burst);
        assert!(!is_brute_force(&stats));
        assert_eq!(classify(&stats), AttackType::SuspiciousActivity);
    }

    #[test]
    fn test_credential_stuffing_rule() {
        // Many usernames from two sources, mostly failing
        let stats = build(
            20,
            EventSpec {
                name: "ConsoleLogin",
                ip_pool: 2,
                user_pool: 8,
                error_rate_pct: 70,
                spread_seconds: 7200,
                ..Default::default()
            },
        );
        assert!(!is_brute_force(&stats));
        assert!(is_credential_stuffing(&stats));
        assert_eq!(classify(&stats), AttackType::CredentialStuffing);
    }

    #[test]
    fn test_privilege_escalation_rule() {
        let stats = build(
            6,
            EventSpec {
                name: "AttachRolePolicy",
                risk: 55.0,
                ..Default::default()
            },
        );
        assert!(is_privilege_escalation(&stats));
        assert_eq!(classify(&stats), AttackType::PrivilegeEscalation);
    }

    #[test]
    fn test_data_exfiltration_rule() {
        let stats = build(
            12,
            EventSpec {
                name: "GetSecretValue",
                risk: 75.0,
                ..Default::default()
            },
        );
        assert!(is_data_exfiltration(&stats));
        assert_eq!(classify(&stats), AttackType::DataExfiltration);
    }

    #[test]
    fn test_resource_abuse_rule() {
        // 10 instance launches in 20 minutes
        let stats = build(
            10,
            EventSpec {
                name: "RunInstances",
                risk: 45.0,
                spread_seconds: 1200,
                ..Default::default()
            },
        );
        assert!(is_resource_abuse(&stats));
        assert_eq!(classify(&stats), AttackType::ResourceAbuse);
    }

    #[test]
    fn test_destructive_attack_rule() {
        let stats = build(
            5,
            EventSpec {
                name: "DeleteBucket",
                risk: 50.0,
                ..Default::default()
            },
        );
        assert!(is_destructive_attack(&stats));
        assert_eq!(classify(&stats), AttackType::DestructiveAttack);
    }

    #[test]
    fn test_reconnaissance_rule() {
        // Enumeration with a third of calls denied
        let stats = build(
            15,
            EventSpec {
                name: "DescribeInstances",
                error_rate_pct: 34,
                risk: 40.0,
                ..Default::default()
            },
        );
        assert!(is_reconnaissance(&stats));
        assert_eq!(classify(&stats), AttackType::Reconnaissance);
    }

    #[test]
    fn test_account_takeover_rule() {
        // Sign-ins from six different sources
        let stats = build(
            6,
            EventSpec {
                name: "AssumeRole",
                ip_pool: 6,
                risk: 50.0,
                ..Default::default()
            },
        );
        assert!(is_account_takeover(&stats));
        assert_eq!(classify(&stats), AttackType::AccountTakeover);
    }

    #[test]
    fn test_api_abuse_rule() {
        // 200 writes in one hour, a third failing
        let stats = build(
            200,
            EventSpec {
                name: "PutObjectTagging",
                error_rate_pct: 35,
                risk: 40.0,
                spread_seconds: 3600,
                ..Default::default()
            },
        );
        assert!(is_api_abuse(&stats));
        assert_eq!(classify(&stats), AttackType::ApiAbuse);
    }

    #[test]
    fn test_geographic_anomaly_rule() {
        let stats = build(
            10,
            EventSpec {
                name: "PutMetricData",
                region_pool: 6,
                risk: 30.0,
                ..Default::default()
            },
        );
        assert!(is_geographic_anomaly(&stats));
        assert_eq!(classify(&stats), AttackType::GeographicAnomaly);
    }

    #[test]
    fn test_time_based_anomaly_rule() {
        // 60 events sharing one timestamp
        let stats = build(
            60,
            EventSpec {
                name: "PutMetricData",
                risk: 30.0,
                spread_seconds: 0,
                ..Default::default()
            },
        );
        assert!(is_time_based_anomaly(&stats));
        assert_eq!(classify(&stats), AttackType::TimeBasedAnomaly);
    }

    #[test]
    fn test_suspicious_activity_rule() {
        let stats = build(
            8,
            EventSpec {
                name: "PutMetricData",
                risk: 80.0,
                ..Default::default()
            },
        );
        assert!(is_suspicious_activity(&stats));
        assert_eq!(classify(&stats), AttackType::SuspiciousActivity);
    }

    #[test]
    fn test_normal_activity_fallthrough() {
        let stats = build(3, EventSpec::default());
        assert_eq!(classify(&stats), AttackType::NormalActivity);
    }
}
