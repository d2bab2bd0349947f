//! Response normalization.
//!
//! Reconciles a raw, possibly partial analysis response into the canonical
//! `AnalysisResult`. Absent fields degrade to empty or zero defaults; entries
//! too malformed to use are skipped and reported, never fatal. Only a missing
//! or non-string id drops a whole record.

use crate::error::CoreError;
use crate::types::analysis::{AnalysisResult, SummaryStats};
use crate::types::raw::{RawAnalysisResult, RawFraudRing, RawSuspiciousAccount, RawTransactionEdge};
use crate::types::{FraudRing, SuspiciousAccount, TransactionEdge};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Canonical result plus the entries that had to be dropped
#[derive(Debug, Default)]
pub struct Normalized {
    pub result: AnalysisResult,
    /// One `MalformedRecord` per skipped entry
    pub skipped: Vec<CoreError>,
}

/// Normalize a raw payload. Never fails.
pub fn normalize(raw: RawAnalysisResult) -> Normalized {
    let mut skipped = Vec::new();

    let suspicious_accounts = sequence("suspicious_accounts", raw.suspicious_accounts, &mut skipped)
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let account = account_from_value(index, entry, &mut skipped);
            keep(account, &mut skipped)
        })
        .collect::<Vec<_>>();

    let rings = match (present(raw.fraud_rings), present(raw.fraud_rngs)) {
        (Some(rings), _) => sequence("fraud_rings", Some(rings), &mut skipped),
        (None, Some(rings)) => {
            debug!("Using misspelled fraud_rngs key for fraud rings");
            sequence("fraud_rngs", Some(rings), &mut skipped)
        }
        (None, None) => Vec::new(),
    };
    let fraud_rings = rings
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let ring = ring_from_value(index, entry, &mut skipped);
            keep(ring, &mut skipped)
        })
        .collect::<Vec<_>>();

    let summary = summary_from_value(raw.summary);

    let all_nodes = sequence("all_nodes", raw.all_nodes, &mut skipped)
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let node = string_id(Some(entry), "node")
                .map_err(|reason| CoreError::malformed("node", index, reason));
            keep(node, &mut skipped)
        })
        .collect::<Vec<_>>();

    let all_edges = sequence("all_edges", raw.all_edges, &mut skipped)
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| keep(edge_from_value(index, entry), &mut skipped))
        .collect::<Vec<_>>();

    info!(
        suspicious = suspicious_accounts.len(),
        rings = fraud_rings.len(),
        nodes = all_nodes.len(),
        edges = all_edges.len(),
        skipped = skipped.len(),
        "Analysis payload normalized"
    );

    Normalized {
        result: AnalysisResult {
            suspicious_accounts,
            fraud_rings,
            summary,
            all_nodes,
            all_edges,
        },
        skipped,
    }
}

fn keep<T>(entry: Result<T, CoreError>, skipped: &mut Vec<CoreError>) -> Option<T> {
    match entry {
        Ok(value) => Some(value),
        Err(e) => {
            skip(e, skipped);
            None
        }
    }
}

fn skip(error: CoreError, skipped: &mut Vec<CoreError>) {
    warn!(error = %error, "Skipping malformed record");
    skipped.push(error);
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Elements of a list-valued field. Anything other than an array (or absent)
/// is reported once and treated as empty.
fn sequence(
    field: &'static str,
    value: Option<Value>,
    skipped: &mut Vec<CoreError>,
) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            let reason = format!("expected an array, found {}", type_name(&other));
            skip(CoreError::malformed(field, 0, reason), skipped);
            Vec::new()
        }
    }
}

/// Extract a non-empty string identifier
fn string_id(value: Option<Value>, field: &str) -> Result<String, String> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        Some(Value::String(_)) => Err(format!("{field} is empty")),
        None | Some(Value::Null) => Err(format!("{field} is missing")),
        Some(other) => Err(format!("{field} is not a string: {other}")),
    }
}

/// Numbers as-is; strings by their leading numeric prefix, so `"90"` and
/// `"87.5%"` both read. Non-finite values are rejected.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => leading_number(text),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    (1..=text.len())
        .rev()
        .filter(|end| text.is_char_boundary(*end))
        .find_map(|end| text[..end].parse::<f64>().ok())
}

/// A numeric field that defaults to zero when absent or unreadable
fn number_or_zero(value: Option<Value>, record: &'static str, index: usize, name: &str) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(value) => number(&value).unwrap_or_else(|| {
            warn!(record, index, field = name, value = %value, "Unreadable number, using 0");
            0.0
        }),
    }
}

/// An optional text field; other types are ignored with a warning
fn optional_string(
    value: Option<Value>,
    record: &'static str,
    index: usize,
    name: &str,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            warn!(record, index, field = name, value = %other, "Ignoring non-string field");
            None
        }
    }
}

/// String elements of a list field. Non-string elements are dropped one by
/// one and reported as `record`.
fn string_list(
    value: Option<Value>,
    record: &'static str,
    index: usize,
    skipped: &mut Vec<CoreError>,
) -> Vec<String> {
    sequence(record, value, skipped)
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(text) => Some(text),
            other => {
                let reason = format!("{record} is not a string: {other}");
                skip(CoreError::malformed(record, index, reason), skipped);
                None
            }
        })
        .collect()
}

fn account_from_value(
    index: usize,
    entry: Value,
    skipped: &mut Vec<CoreError>,
) -> Result<SuspiciousAccount, CoreError> {
    let raw: RawSuspiciousAccount = serde_json::from_value(entry)
        .map_err(|e| CoreError::malformed("suspicious_account", index, e.to_string()))?;
    let account_id = string_id(raw.account_id, "account_id")
        .map_err(|reason| CoreError::malformed("suspicious_account", index, reason))?;

    let score = number_or_zero(raw.suspicion_score, "suspicious_account", index, "suspicion_score");
    let patterns = string_list(raw.detected_patterns, "detected_pattern", index, skipped);
    let ring_id = optional_string(raw.ring_id, "suspicious_account", index, "ring_id")
        .filter(|ring_id| !ring_id.is_empty());

    Ok(SuspiciousAccount::new(account_id, score, patterns, ring_id).with_extra(raw.extra))
}

fn ring_from_value(
    index: usize,
    entry: Value,
    skipped: &mut Vec<CoreError>,
) -> Result<FraudRing, CoreError> {
    let raw: RawFraudRing = serde_json::from_value(entry)
        .map_err(|e| CoreError::malformed("fraud_ring", index, e.to_string()))?;
    let ring_id = string_id(raw.ring_id, "ring_id")
        .map_err(|reason| CoreError::malformed("fraud_ring", index, reason))?;

    // Bad members are dropped one by one; the ring survives.
    let member_accounts = sequence("ring_member", raw.member_accounts, skipped)
        .into_iter()
        .filter_map(|member| {
            let member = string_id(Some(member), "member account")
                .map_err(|reason| CoreError::malformed("ring_member", index, reason));
            keep(member, skipped)
        })
        .collect();

    let pattern_type =
        optional_string(raw.pattern_type, "fraud_ring", index, "pattern_type").unwrap_or_default();
    let risk_score = number_or_zero(raw.risk_score, "fraud_ring", index, "risk_score");

    Ok(FraudRing::new(ring_id, member_accounts, pattern_type, risk_score).with_extra(raw.extra))
}

fn edge_from_value(index: usize, entry: Value) -> Result<TransactionEdge, CoreError> {
    let raw: RawTransactionEdge = serde_json::from_value(entry)
        .map_err(|e| CoreError::malformed("transaction_edge", index, e.to_string()))?;
    let source = string_id(raw.source, "source")
        .map_err(|reason| CoreError::malformed("transaction_edge", index, reason))?;
    let target = string_id(raw.target, "target")
        .map_err(|reason| CoreError::malformed("transaction_edge", index, reason))?;

    Ok(TransactionEdge {
        source,
        target,
        amount: number_or_zero(raw.amount, "transaction_edge", index, "amount"),
        timestamp: optional_string(raw.timestamp, "transaction_edge", index, "timestamp"),
    })
}

/// Read each summary field on its own; an unreadable field is zero, the
/// others survive. Integral floats (`412.0`) are accepted as counts.
fn summary_from_value(value: Option<Value>) -> SummaryStats {
    let fields = match value {
        None | Some(Value::Null) => return SummaryStats::default(),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            warn!(found = type_name(&other), "Malformed summary, using zero defaults");
            return SummaryStats::default();
        }
    };

    SummaryStats {
        total_accounts_analyzed: count(&fields, "total_accounts_analyzed"),
        suspicious_accounts_flagged: count(&fields, "suspicious_accounts_flagged"),
        fraud_rings_detected: count(&fields, "fraud_rings_detected"),
        processing_time_seconds: summary_number(&fields, "processing_time_seconds").unwrap_or(0.0),
    }
}

fn summary_number(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    let value = fields.get(name).filter(|v| !v.is_null())?;
    let parsed = number(value);
    if parsed.is_none() {
        warn!(field = name, value = %value, "Unreadable summary field, using 0");
    }
    parsed
}

fn count(fields: &Map<String, Value>, name: &str) -> u64 {
    summary_number(fields, name)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RingPattern;
    use serde_json::json;

    fn normalize_json(value: Value) -> Normalized {
        normalize(RawAnalysisResult::from_value(value).unwrap())
    }

    #[test]
    fn test_empty_payload_defaults() {
        let normalized = normalize_json(json!({}));

        assert!(normalized.result.suspicious_accounts.is_empty());
        assert!(normalized.result.fraud_rings.is_empty());
        assert!(normalized.result.all_nodes.is_empty());
        assert!(normalized.result.all_edges.is_empty());
        assert_eq!(normalized.result.summary, SummaryStats::default());
        assert!(normalized.skipped.is_empty());
    }

    #[test]
    fn test_misspelled_rings_key_fallback() {
        let normalized = normalize_json(json!({
            "fraud_rngs": [
                {"ring_id": "RING_001", "pattern_type": "cycle", "member_accounts": ["ACC_A", "ACC_B"], "risk_score": 91.0}
            ]
        }));

        assert_eq!(normalized.result.fraud_rings.len(), 1);
        assert_eq!(normalized.result.fraud_rings[0].pattern, RingPattern::Cycle);
    }

    #[test]
    fn test_correct_key_wins_over_misspelled() {
        let normalized = normalize_json(json!({
            "fraud_rings": [],
            "fraud_rngs": [{"ring_id": "RING_001", "member_accounts": []}]
        }));

        assert!(normalized.result.fraud_rings.is_empty());
    }

    #[test]
    fn test_malformed_account_is_skipped() {
        let normalized = normalize_json(json!({
            "suspicious_accounts": [
                {"account_id": "ACC_001", "suspicion_score": 80.0, "detected_patterns": ["fan_in"]},
                {"account_id": 42, "suspicion_score": 70.0},
                {"suspicion_score": 10.0},
                {"account_id": "ACC_002"}
            ]
        }));

        let ids: Vec<_> = normalized
            .result
            .suspicious_accounts
            .iter()
            .map(|a| a.account_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ACC_001", "ACC_002"]);
        assert_eq!(normalized.skipped.len(), 2);
        assert!(matches!(
            normalized.skipped[0],
            CoreError::MalformedRecord { record: "suspicious_account", index: 1, .. }
        ));

        let defaulted = &normalized.result.suspicious_accounts[1];
        assert_eq!(defaulted.suspicion_score, 0.0);
        assert!(defaulted.detected_patterns.is_empty());
    }

    #[test]
    fn test_bad_ring_members_dropped_individually() {
        let normalized = normalize_json(json!({
            "fraud_rings": [
                {"ring_id": "RING_001", "pattern_type": "shell", "member_accounts": ["ACC_A", 7, null, "ACC_B"]},
                {"pattern_type": "cycle", "member_accounts": ["ACC_C"]}
            ]
        }));

        assert_eq!(normalized.result.fraud_rings.len(), 1);
        assert_eq!(
            normalized.result.fraud_rings[0].member_accounts,
            vec!["ACC_A".to_string(), "ACC_B".to_string()]
        );
        // two bad members plus the ring without an id
        assert_eq!(normalized.skipped.len(), 3);
    }

    #[test]
    fn test_edges_and_nodes() {
        let normalized = normalize_json(json!({
            "all_nodes": ["ACC_A", "ACC_B", 3],
            "all_edges": [
                {"source": "ACC_A", "target": "ACC_B", "amount": 250.0, "timestamp": "2024-01-01 10:00:00"},
                {"sender_id": "ACC_B", "receiver_id": "ACC_A", "amount": 10.0},
                {"source": "ACC_A"}
            ]
        }));

        assert_eq!(normalized.result.all_nodes, vec!["ACC_A", "ACC_B"]);
        assert_eq!(normalized.result.all_edges.len(), 2);
        assert_eq!(normalized.result.all_edges[1].source, "ACC_B");
        assert_eq!(normalized.skipped.len(), 2);
    }

    #[test]
    fn test_malformed_summary_degrades_to_zero() {
        let normalized = normalize_json(json!({
            "summary": {"total_accounts_analyzed": "many"}
        }));
        assert_eq!(normalized.result.summary, SummaryStats::default());

        let normalized = normalize_json(json!({
            "summary": {"total_accounts_analyzed": 120, "suspicious_accounts_flagged": 9, "fraud_rings_detected": 3, "processing_time_seconds": 1.4}
        }));
        assert_eq!(normalized.result.summary.total_accounts_analyzed, 120);
        assert_eq!(normalized.result.summary.processing_time_seconds, 1.4);
    }

    #[test]
    fn test_wrong_typed_list_does_not_drop_siblings() {
        let normalized = normalize_json(json!({
            "suspicious_accounts": [{"account_id": "ACC_1", "suspicion_score": 80.0}],
            "all_edges": {},
            "all_nodes": "ACC_1"
        }));

        assert_eq!(normalized.result.suspicious_accounts.len(), 1);
        assert!(normalized.result.all_edges.is_empty());
        assert!(normalized.result.all_nodes.is_empty());
        assert_eq!(normalized.skipped.len(), 2);
        assert!(matches!(
            normalized.skipped[0],
            CoreError::MalformedRecord { record: "all_nodes", .. }
        ));
    }

    #[test]
    fn test_wrong_typed_rings_key_is_reported() {
        let normalized = normalize_json(json!({"fraud_rings": "RING_001"}));

        assert!(normalized.result.fraud_rings.is_empty());
        assert!(matches!(
            normalized.skipped[0],
            CoreError::MalformedRecord { record: "fraud_rings", index: 0, .. }
        ));
    }

    #[test]
    fn test_bad_account_fields_default_instead_of_dropping() {
        let normalized = normalize_json(json!({
            "suspicious_accounts": [
                {"account_id": "ACC_1", "suspicion_score": "90", "detected_patterns": ["cycle", 3, "fan_in"], "ring_id": 12},
                {"account_id": "ACC_2", "suspicion_score": "87.5%", "detected_patterns": "fan_out"},
                {"account_id": "ACC_3", "suspicion_score": "high", "detected_patterns": null}
            ]
        }));

        let accounts = &normalized.result.suspicious_accounts;
        assert_eq!(accounts.len(), 3);

        assert_eq!(accounts[0].suspicion_score, 90.0);
        assert_eq!(accounts[0].detected_patterns, vec!["cycle", "fan_in"]);
        assert_eq!(accounts[0].ring_id, None);

        assert_eq!(accounts[1].suspicion_score, 87.5);
        assert!(accounts[1].detected_patterns.is_empty());

        assert_eq!(accounts[2].suspicion_score, 0.0);

        // the numeric tag and the non-list pattern field
        assert_eq!(normalized.skipped.len(), 2);
        assert!(matches!(
            normalized.skipped[0],
            CoreError::MalformedRecord { record: "detected_pattern", index: 0, .. }
        ));
    }

    #[test]
    fn test_bad_ring_fields_keep_the_ring() {
        let normalized = normalize_json(json!({
            "fraud_rings": [
                {"ring_id": "RING_001", "member_accounts": ["ACC_A", "ACC_B"], "pattern_type": 5, "risk_score": "high"}
            ]
        }));

        let ring = &normalized.result.fraud_rings[0];
        assert_eq!(ring.member_accounts.len(), 2);
        assert_eq!(ring.risk_score, 0.0);
        assert_eq!(ring.pattern, RingPattern::Unknown);
        assert!(normalized.skipped.is_empty());
    }

    #[test]
    fn test_edge_amount_and_timestamp_tolerance() {
        let normalized = normalize_json(json!({
            "all_edges": [
                {"source": "ACC_A", "target": "ACC_B", "amount": "125.50", "timestamp": 1700000000}
            ]
        }));

        let edge = &normalized.result.all_edges[0];
        assert_eq!(edge.amount, 125.5);
        assert_eq!(edge.timestamp, None);
    }

    #[test]
    fn test_summary_fields_read_independently() {
        let normalized = normalize_json(json!({
            "summary": {
                "total_accounts_analyzed": 412.0,
                "suspicious_accounts_flagged": "17",
                "fraud_rings_detected": [],
                "processing_time_seconds": 2.37
            }
        }));

        let summary = &normalized.result.summary;
        assert_eq!(summary.total_accounts_analyzed, 412);
        assert_eq!(summary.suspicious_accounts_flagged, 17);
        assert_eq!(summary.fraud_rings_detected, 0);
        assert_eq!(summary.processing_time_seconds, 2.37);
    }

    #[test]
    fn test_unknown_fields_carried_through() {
        let normalized = normalize_json(json!({
            "suspicious_accounts": [{"account_id": "ACC_1", "community_id": 4}],
            "fraud_rings": [{"ring_id": "RING_001", "member_accounts": [], "density": 0.8}]
        }));

        assert_eq!(normalized.result.suspicious_accounts[0].extra["community_id"], 4);
        assert_eq!(normalized.result.fraud_rings[0].extra["density"], 0.8);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(number(&json!(" 42abc")), Some(42.0));
        assert_eq!(number(&json!("1e2")), Some(100.0));
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!(true)), None);
    }
}
