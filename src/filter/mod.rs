//! False-positive filtering of suspicious accounts.
//!
//! Three exclusion passes run in order: name patterns, moderate-score high
//! velocity, then transaction behavior. Survivors are re-sorted by score.

pub mod behavior;
pub mod name_rules;

pub use behavior::is_legitimate_high_volume;
pub use name_rules::{legitimate_name_match, KeywordGroup};

use crate::types::{AnalysisResult, SuspiciousAccount, TransactionEdge};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Tunables for the exclusion passes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// High-velocity accounts scoring below this are treated as merchants
    pub high_velocity_max_score: f64,
    /// Minimum number of edges before the behavioral pass considers an account
    pub min_account_edges: usize,
    /// First business hour (inclusive)
    pub business_hours_start: u32,
    /// Last business hour (inclusive)
    pub business_hours_end: u32,
    /// Receipts must number strictly more than this
    pub min_receipts: usize,
    /// Absolute spread of received amounts must stay below this
    pub max_amount_spread: f64,
    /// Run the behavioral pass at all
    pub behavioral_check: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            high_velocity_max_score: 70.0,
            min_account_edges: 10,
            business_hours_start: 9,
            business_hours_end: 17,
            min_receipts: 5,
            max_amount_spread: 100.0,
            behavioral_check: true,
        }
    }
}

/// Why an account was removed from the suspicious set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    NamePattern {
        group: KeywordGroup,
        keyword: &'static str,
    },
    ModerateVelocity {
        score: f64,
    },
    LegitimateHighVolume,
}

impl ExclusionReason {
    /// Short key used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ExclusionReason::NamePattern { .. } => "name_pattern",
            ExclusionReason::ModerateVelocity { .. } => "moderate_velocity",
            ExclusionReason::LegitimateHighVolume => "legitimate_high_volume",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::NamePattern { group, keyword } => {
                write!(f, "{group} name pattern ({keyword})")
            }
            ExclusionReason::ModerateVelocity { score } => {
                write!(f, "high velocity with moderate score {score:.1}")
            }
            ExclusionReason::LegitimateHighVolume => f.write_str("legitimate high-volume behavior"),
        }
    }
}

/// An account removed by the filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub account_id: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Result of a filtering run
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Surviving accounts, non-increasing by score
    pub retained: Vec<SuspiciousAccount>,
    /// Removed accounts in input order
    pub excluded: Vec<Exclusion>,
}

/// Heuristic false-positive filter
#[derive(Debug, Clone, Default)]
pub struct FalsePositiveFilter {
    settings: FilterSettings,
}

impl FalsePositiveFilter {
    pub fn new(settings: FilterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Run all exclusion passes over `accounts`, using `edges` for the
    /// behavioral pass.
    pub fn filter(&self, accounts: Vec<SuspiciousAccount>, edges: &[TransactionEdge]) -> FilterOutcome {
        let before = accounts.len();
        let mut outcome = FilterOutcome::default();

        for account in accounts {
            match self.exclusion_reason(&account, edges) {
                Some(reason) => {
                    debug!(
                        account_id = %account.account_id,
                        reason = %reason,
                        "Filtered out legitimate account"
                    );
                    outcome.excluded.push(Exclusion {
                        account_id: account.account_id,
                        reason,
                    });
                }
                None => outcome.retained.push(account),
            }
        }

        // Stable: equal scores keep their input order.
        outcome
            .retained
            .sort_by(|a, b| b.suspicion_score.total_cmp(&a.suspicion_score));

        info!(
            before,
            after = outcome.retained.len(),
            removed = outcome.excluded.len(),
            "False positive filtering complete"
        );

        outcome
    }

    /// Filter the suspicious accounts of `result` in place and recompute the
    /// flagged count. Returns the exclusions.
    pub fn apply(&self, result: &mut AnalysisResult) -> Vec<Exclusion> {
        let accounts = std::mem::take(&mut result.suspicious_accounts);
        let outcome = self.filter(accounts, &result.all_edges);

        result.suspicious_accounts = outcome.retained;
        result.recompute_flagged();

        outcome.excluded
    }

    fn exclusion_reason(
        &self,
        account: &SuspiciousAccount,
        edges: &[TransactionEdge],
    ) -> Option<ExclusionReason> {
        if let Some((group, keyword)) = legitimate_name_match(&account.account_id) {
            return Some(ExclusionReason::NamePattern { group, keyword });
        }

        if account.has_tag("high_velocity")
            && account.suspicion_score < self.settings.high_velocity_max_score
        {
            return Some(ExclusionReason::ModerateVelocity {
                score: account.suspicion_score,
            });
        }

        if self.settings.behavioral_check
            && is_legitimate_high_volume(&account.account_id, edges, &self.settings)
        {
            return Some(ExclusionReason::LegitimateHighVolume);
        }

        None
    }
}
