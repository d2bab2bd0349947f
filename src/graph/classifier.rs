//! Node and edge classification.
//!
//! The single place where resolved tags turn into display categories and link
//! patterns.

use crate::types::{LinkPattern, PatternCategory, PatternTag, SuspiciousAccount};
use serde::Serialize;

/// Category of a node given its suspicious metadata, if any
pub fn classify_node(account: Option<&SuspiciousAccount>) -> PatternCategory {
    match account {
        Some(account) => account.category(),
        None => PatternCategory::Normal,
    }
}

/// Pattern of an explicit edge from the union of both endpoints' tags.
///
/// Edges touching no suspicious account are always `Normal`.
pub fn classify_edge(
    source: Option<&SuspiciousAccount>,
    target: Option<&SuspiciousAccount>,
) -> LinkPattern {
    let tags = source
        .into_iter()
        .chain(target)
        .flat_map(|account| account.pattern_tags.iter());

    LinkPattern::from_tags(tags)
}

/// How many suspicious accounts carry each pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStats {
    pub cycles: usize,
    pub fan_in: usize,
    pub fan_out: usize,
    pub shell: usize,
    pub velocity: usize,
}

impl PatternStats {
    /// Count per pattern; an account with several patterns counts once in each
    pub fn from_accounts(accounts: &[SuspiciousAccount]) -> Self {
        let count = |tag: PatternTag| accounts.iter().filter(|a| a.has_pattern(tag)).count();

        Self {
            cycles: count(PatternTag::Cycle),
            fan_in: count(PatternTag::FanIn),
            fan_out: count(PatternTag::FanOut),
            shell: count(PatternTag::Shell),
            velocity: count(PatternTag::HighVelocity),
        }
    }
}
