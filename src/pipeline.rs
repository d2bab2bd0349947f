//! Normalize → filter → build, run once per analysis response.

use crate::config::AppConfig;
use crate::error::{CoreError, Result};
use crate::filter::{Exclusion, FalsePositiveFilter};
use crate::graph::{GraphBuilder, GraphData};
use crate::metrics::{PipelineMetrics, Stage};
use crate::normalizer::normalize;
use crate::types::{AnalysisResult, RawAnalysisResult};
use std::time::Instant;
use tracing::info;

/// Everything produced by one pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    /// Normalized, filtered analysis with the recomputed summary
    pub analysis: AnalysisResult,
    /// Graph built from `analysis`
    pub graph: GraphData,
    /// Malformed records dropped during normalization
    pub skipped: Vec<CoreError>,
    /// Accounts removed by the false-positive filter
    pub excluded: Vec<Exclusion>,
}

/// Synchronous forensics pipeline
pub struct Pipeline {
    filter: FalsePositiveFilter,
    builder: GraphBuilder,
    metrics: PipelineMetrics,
}

impl Pipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            filter: FalsePositiveFilter::new(config.filter.clone()),
            builder: GraphBuilder::new(config.graph.clone()),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Parse and process raw payload bytes
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<PipelineOutput> {
        let raw = RawAnalysisResult::from_slice(bytes)?;
        Ok(self.run(raw))
    }

    /// Process an already-parsed payload. Never fails.
    pub fn run(&self, raw: RawAnalysisResult) -> PipelineOutput {
        let started = Instant::now();
        let normalized = normalize(raw);
        self.metrics.record_stage(Stage::Normalize, started.elapsed());

        let mut analysis = normalized.result;
        let received = analysis.suspicious_accounts.len();

        let started = Instant::now();
        let excluded = self.filter.apply(&mut analysis);
        self.metrics.record_stage(Stage::Filter, started.elapsed());
        for exclusion in &excluded {
            self.metrics.record_exclusion(exclusion.reason.kind());
        }

        let started = Instant::now();
        let graph = self.builder.build(&analysis);
        self.metrics.record_stage(Stage::Build, started.elapsed());

        self.metrics.record_run(
            received,
            analysis.suspicious_accounts.len(),
            normalized.skipped.len(),
            graph.nodes.len(),
            graph.links.len(),
        );

        info!(
            flagged = analysis.summary.suspicious_accounts_flagged,
            excluded = excluded.len(),
            skipped = normalized.skipped.len(),
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "Analysis complete with false positive filtering"
        );

        PipelineOutput {
            analysis,
            graph,
            skipped: normalized.skipped,
            excluded,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
