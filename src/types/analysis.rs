//! Canonical analysis result, populated once by the normalizer

use crate::types::account::SuspiciousAccount;
use crate::types::ring::FraudRing;
use crate::types::transaction::TransactionEdge;
use serde::{Deserialize, Serialize};

/// Headline statistics reported with an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryStats {
    pub total_accounts_analyzed: u64,
    /// Derived: equals the number of retained suspicious accounts after filtering
    pub suspicious_accounts_flagged: u64,
    pub fraud_rings_detected: u64,
    pub processing_time_seconds: f64,
}

/// Fully-populated analysis result. Nothing downstream re-checks optionality.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: SummaryStats,
    pub all_nodes: Vec<String>,
    pub all_edges: Vec<TransactionEdge>,
}

impl AnalysisResult {
    /// Recompute the derived flagged count from the current account list
    pub fn recompute_flagged(&mut self) {
        self.summary.suspicious_accounts_flagged = self.suspicious_accounts.len() as u64;
    }

    /// Look up a ring by id
    pub fn ring(&self, ring_id: &str) -> Option<&FraudRing> {
        self.fraud_rings.iter().find(|ring| ring.ring_id == ring_id)
    }

    /// Ids of suspicious accounts tagged with `ring_id`, in list order
    pub fn ring_members_flagged(&self, ring_id: &str) -> Vec<&str> {
        self.suspicious_accounts
            .iter()
            .filter(|acc| acc.ring_id.as_deref() == Some(ring_id))
            .map(|acc| acc.account_id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, ring: Option<&str>) -> SuspiciousAccount {
        SuspiciousAccount::new(id, 50.0, Vec::new(), ring.map(str::to_string))
    }

    #[test]
    fn test_recompute_flagged_ignores_upstream_value() {
        let mut result = AnalysisResult {
            suspicious_accounts: vec![account("ACC_1", None), account("ACC_2", None)],
            summary: SummaryStats {
                suspicious_accounts_flagged: 50,
                ..SummaryStats::default()
            },
            ..AnalysisResult::default()
        };

        result.recompute_flagged();
        assert_eq!(result.summary.suspicious_accounts_flagged, 2);
    }

    #[test]
    fn test_ring_members_flagged() {
        let result = AnalysisResult {
            suspicious_accounts: vec![
                account("ACC_1", Some("RING_001")),
                account("ACC_2", Some("RING_002")),
                account("ACC_3", Some("RING_001")),
            ],
            ..AnalysisResult::default()
        };

        assert_eq!(result.ring_members_flagged("RING_001"), vec!["ACC_1", "ACC_3"]);
        assert!(result.ring_members_flagged("RING_404").is_empty());
    }

    #[test]
    fn test_summary_defaults_missing_fields() {
        let summary: SummaryStats =
            serde_json::from_str(r#"{"total_accounts_analyzed": 12}"#).unwrap();
        assert_eq!(summary.total_accounts_analyzed, 12);
        assert_eq!(summary.fraud_rings_detected, 0);
        assert_eq!(summary.processing_time_seconds, 0.0);
    }
}
