//! CrimsonTrace forensics core
//!
//! Turns a fraud-analysis response (suspicious accounts, fraud rings and
//! optional transaction edges) into a renderable account graph, after
//! removing accounts that look like legitimate high-volume actors.

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod graph;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod source;
pub mod types;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use export::{report_filename, write_report, ForensicsReport};
pub use filter::FalsePositiveFilter;
pub use graph::{build_graph, GraphBuilder, GraphData};
pub use normalizer::normalize;
pub use pipeline::{Pipeline, PipelineOutput};
pub use source::PayloadSource;
pub use types::{AnalysisResult, FraudRing, RawAnalysisResult, SuspiciousAccount, TransactionEdge};
