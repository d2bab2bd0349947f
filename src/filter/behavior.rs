//! Behavioral legitimacy check for high-volume accounts.
//!
//! An account trading only during business hours and receiving near-identical
//! amounts looks like payroll or a subscription merchant rather than a mule.

use crate::filter::FilterSettings;
use crate::types::TransactionEdge;
use tracing::debug;

/// Whether `account_id` behaves like a legitimate high-volume actor.
///
/// Unparsable or missing timestamps fail the business-hours check, so the
/// account stays suspicious.
pub fn is_legitimate_high_volume(
    account_id: &str,
    edges: &[TransactionEdge],
    settings: &FilterSettings,
) -> bool {
    let involved: Vec<&TransactionEdge> =
        edges.iter().filter(|edge| edge.involves(account_id)).collect();

    if involved.len() < settings.min_account_edges {
        return false;
    }

    let business_hours = within_business_hours(account_id, &involved, settings);

    let amounts: Vec<f64> = involved
        .iter()
        .filter(|edge| edge.target == account_id)
        .map(|edge| edge.amount)
        .collect();
    let consistent = amounts_consistent(&amounts, settings);

    debug!(
        account_id = %account_id,
        edges = involved.len(),
        receipts = amounts.len(),
        business_hours,
        consistent,
        "Behavioral check"
    );

    business_hours && consistent
}

fn within_business_hours(
    account_id: &str,
    edges: &[&TransactionEdge],
    settings: &FilterSettings,
) -> bool {
    edges.iter().all(|edge| match edge.hour_of_day() {
        Ok(hour) => (settings.business_hours_start..=settings.business_hours_end).contains(&hour),
        Err(e) => {
            debug!(account_id = %account_id, error = %e, "Timestamp rejected by business-hours check");
            false
        }
    })
}

fn amounts_consistent(amounts: &[f64], settings: &FilterSettings) -> bool {
    if amounts.len() <= settings.min_receipts {
        return false;
    }

    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);

    max - min < settings.max_amount_spread
}
