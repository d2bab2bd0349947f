//! Error types for the forensics core.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can surface from the transformation pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An account, ring or edge entry too malformed to process.
    #[error("Malformed {record} record at index {index}: {reason}")]
    MalformedRecord {
        /// Kind of record ("suspicious_account", "fraud_ring", ...).
        record: &'static str,
        /// Position of the entry in its source sequence.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A transaction timestamp that could not be parsed.
    #[error("Unparsable timestamp: {value:?}")]
    UnparsableTimestamp {
        /// The raw timestamp text.
        value: String,
    },

    /// The payload is not a JSON object at all.
    #[error("Invalid analysis payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// Writing the export artifact failed.
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    /// Serializing an output structure failed.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl CoreError {
    /// Build a `MalformedRecord` error.
    pub fn malformed(record: &'static str, index: usize, reason: impl Into<String>) -> Self {
        CoreError::MalformedRecord {
            record,
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message() {
        let err = CoreError::malformed("fraud_ring", 3, "ring_id is not a string");
        assert_eq!(
            err.to_string(),
            "Malformed fraud_ring record at index 3: ring_id is not a string"
        );
    }

    #[test]
    fn test_unparsable_timestamp_message() {
        let err = CoreError::UnparsableTimestamp {
            value: "yesterday".to_string(),
        };
        assert!(err.to_string().contains("\"yesterday\""));
    }
}
