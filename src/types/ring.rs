//! Fraud ring groupings and ring risk classification

use crate::types::pattern::RingPattern;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Determine risk level from a 0 - 100 score and thresholds
    pub fn from_score(score: f64, thresholds: &RiskLevelThresholds) -> Self {
        if score >= thresholds.critical {
            RiskLevel::Critical
        } else if score >= thresholds.high {
            RiskLevel::High
        } else if score >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// Configurable risk level thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevelThresholds {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            medium: 40.0,
            high: 60.0,
            critical: 85.0,
        }
    }
}

/// A group of accounts believed to execute one fraud topology
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudRing {
    /// Ring identifier (`RING_001`, ...)
    pub ring_id: String,

    /// Member accounts in backend order
    pub member_accounts: Vec<String>,

    /// Raw pattern type as reported (`cycle_length_3`, `fan_in`, `mixed`, ...)
    pub pattern_type: String,

    /// Ring risk score (0 - 100)
    pub risk_score: f64,

    /// Topology resolved from `pattern_type`
    #[serde(skip)]
    pub pattern: RingPattern,

    /// Backend fields this crate does not interpret, exported unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FraudRing {
    /// Create a ring and resolve its topology
    pub fn new(
        ring_id: impl Into<String>,
        member_accounts: Vec<String>,
        pattern_type: impl Into<String>,
        risk_score: f64,
    ) -> Self {
        let pattern_type = pattern_type.into();
        let pattern = RingPattern::from_pattern_type(&pattern_type);

        Self {
            ring_id: ring_id.into(),
            member_accounts,
            pattern_type,
            risk_score,
            pattern,
            extra: Map::new(),
        }
    }

    /// Attach uninterpreted backend fields
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Risk level of the ring under the given thresholds
    pub fn risk_level(&self, thresholds: &RiskLevelThresholds) -> RiskLevel {
        RiskLevel::from_score(self.risk_score, thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_score() {
        let thresholds = RiskLevelThresholds::default();

        assert_eq!(RiskLevel::from_score(12.0, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.0, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(84.9, &thresholds), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(85.0, &thresholds), RiskLevel::Critical);
    }

    #[test]
    fn test_ring_resolves_pattern() {
        let ring = FraudRing::new(
            "RING_007",
            vec!["ACC_A".to_string(), "ACC_B".to_string()],
            "Fan_Out",
            72.5,
        );

        assert_eq!(ring.pattern, RingPattern::FanOut);
        assert_eq!(ring.risk_level(&RiskLevelThresholds::default()), RiskLevel::High);

        let json = serde_json::to_value(&ring).unwrap();
        assert_eq!(json["pattern_type"], "Fan_Out");
        assert!(json.get("pattern").is_none());
    }
}
