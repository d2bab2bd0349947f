//! Transaction edges between accounts

use crate::error::{CoreError, Result};
use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Serialize;

/// Naive layouts accepted besides RFC 3339. The backend CSV export uses the
/// space-separated form.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A transfer of funds from `source` to `target`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEdge {
    /// Sending account
    pub source: String,

    /// Receiving account
    pub target: String,

    /// Transferred amount in currency units
    pub amount: f64,

    /// Raw timestamp text, kept unparsed until a consumer needs it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TransactionEdge {
    /// Create an edge without a timestamp
    pub fn new(source: impl Into<String>, target: impl Into<String>, amount: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            amount,
            timestamp: None,
        }
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Whether the account sends or receives on this edge
    pub fn involves(&self, account_id: &str) -> bool {
        self.source == account_id || self.target == account_id
    }

    /// Hour of day (0 - 23) as recorded in the timestamp.
    ///
    /// Offset-qualified timestamps report the wall-clock hour of their own
    /// offset. A missing timestamp is reported as unparsable.
    pub fn hour_of_day(&self) -> Result<u32> {
        match &self.timestamp {
            Some(raw) => parse_hour(raw),
            None => Err(CoreError::UnparsableTimestamp {
                value: String::new(),
            }),
        }
    }
}

fn parse_hour(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.hour());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|dt| dt.hour())
        .ok_or_else(|| CoreError::UnparsableTimestamp {
            value: raw.to_string(),
        })
}
