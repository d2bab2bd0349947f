//! Type definitions for the forensics core

pub mod account;
pub mod analysis;
pub mod pattern;
pub mod raw;
pub mod ring;
pub mod transaction;

pub use account::SuspiciousAccount;
pub use analysis::{AnalysisResult, SummaryStats};
pub use pattern::{LinkPattern, PatternCategory, PatternTag, RingPattern};
pub use raw::RawAnalysisResult;
pub use ring::{FraudRing, RiskLevel, RiskLevelThresholds};
pub use transaction::TransactionEdge;
