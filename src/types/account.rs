//! Suspicious account records produced by the detection backend

use crate::types::pattern::{PatternCategory, PatternTag};
use serde::Serialize;
use serde_json::{Map, Value};

/// An account flagged by the detection backend.
///
/// `detected_patterns` keeps the backend's tag order; `pattern_tags` holds the
/// same tags resolved once at ingestion and is never exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousAccount {
    /// Account identifier, conventionally prefixed `ACC_`
    pub account_id: String,

    /// Suspicion score (0 - 100)
    pub suspicion_score: f64,

    /// Detection tags in backend order
    pub detected_patterns: Vec<String>,

    /// Fraud ring the account was grouped into, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_id: Option<String>,

    /// Resolved tags, parallel to `detected_patterns`
    #[serde(skip)]
    pub pattern_tags: Vec<PatternTag>,

    /// Backend fields this crate does not interpret, exported unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SuspiciousAccount {
    /// Create an account and resolve its tags
    pub fn new(
        account_id: impl Into<String>,
        suspicion_score: f64,
        detected_patterns: Vec<String>,
        ring_id: Option<String>,
    ) -> Self {
        let pattern_tags = detected_patterns
            .iter()
            .map(|tag| PatternTag::from_tag(tag))
            .collect();

        Self {
            account_id: account_id.into(),
            suspicion_score,
            detected_patterns,
            ring_id,
            pattern_tags,
            extra: Map::new(),
        }
    }

    /// Attach uninterpreted backend fields
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Whether any raw tag equals `tag` exactly
    pub fn has_tag(&self, tag: &str) -> bool {
        self.detected_patterns.iter().any(|p| p == tag)
    }

    /// Whether any resolved tag is `tag`
    pub fn has_pattern(&self, tag: PatternTag) -> bool {
        self.pattern_tags.contains(&tag)
    }

    /// Display category of the account
    pub fn category(&self) -> PatternCategory {
        PatternCategory::classify(&self.pattern_tags, true)
    }
}
