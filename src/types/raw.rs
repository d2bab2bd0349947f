//! Untrusted payload shapes as received from the analysis service.
//!
//! Every field is optional and kept as a `serde_json::Value`, so a record or
//! field of the wrong type can be rejected without losing its siblings.

use crate::error::{CoreError, Result};
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw analysis response, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysisResult {
    #[serde(default)]
    pub suspicious_accounts: Option<Value>,

    #[serde(default)]
    pub fraud_rings: Option<Value>,

    /// Misspelled key emitted by some backend builds
    #[serde(default)]
    pub fraud_rngs: Option<Value>,

    #[serde(default)]
    pub summary: Option<Value>,

    #[serde(default)]
    pub all_nodes: Option<Value>,

    #[serde(default)]
    pub all_edges: Option<Value>,
}

impl RawAnalysisResult {
    /// Parse a payload. Fails only when the document is not a JSON object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(CoreError::InvalidPayload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CoreError::InvalidPayload(serde_json::Error::custom(
                "expected a JSON object at the top level",
            )));
        }
        serde_json::from_value(value).map_err(CoreError::InvalidPayload)
    }
}

/// Raw suspicious account entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawSuspiciousAccount {
    #[serde(default)]
    pub account_id: Option<Value>,
    #[serde(default)]
    pub suspicion_score: Option<Value>,
    #[serde(default)]
    pub detected_patterns: Option<Value>,
    #[serde(default)]
    pub ring_id: Option<Value>,
    /// Any other fields, passed through to the export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw fraud ring entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawFraudRing {
    #[serde(default)]
    pub ring_id: Option<Value>,
    #[serde(default)]
    pub member_accounts: Option<Value>,
    #[serde(default)]
    pub pattern_type: Option<Value>,
    #[serde(default)]
    pub risk_score: Option<Value>,
    /// Any other fields, passed through to the export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw transaction edge entry. The backend CSV column names are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransactionEdge {
    #[serde(default, alias = "sender_id")]
    pub source: Option<Value>,
    #[serde(default, alias = "receiver_id")]
    pub target: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}
