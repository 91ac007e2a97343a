use serde::{Deserialize, Serialize};

/// Human-readable output for one cluster: a short narrative paragraph and
/// the ordered list of concrete risk factors behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub risk_factors: Vec<String>,
}
