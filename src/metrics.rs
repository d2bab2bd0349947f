//! Run statistics for the forensics pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::info;

/// Pipeline stages that are timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Normalize,
    Filter,
    Build,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Filter => "filter",
            Stage::Build => "build",
        }
    }
}

/// Metrics collector for pipeline runs
pub struct PipelineMetrics {
    /// Completed pipeline runs
    pub runs: AtomicU64,
    /// Suspicious accounts received from the backend
    pub accounts_received: AtomicU64,
    /// Suspicious accounts retained after filtering
    pub accounts_retained: AtomicU64,
    /// Malformed records skipped by the normalizer
    pub records_skipped: AtomicU64,
    /// Nodes and links produced
    pub nodes_built: AtomicU64,
    pub links_built: AtomicU64,
    /// Exclusions by reason kind
    exclusions_by_reason: RwLock<HashMap<&'static str, u64>>,
    /// Stage durations (in microseconds)
    stage_times: RwLock<HashMap<Stage, Vec<u64>>>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            accounts_received: AtomicU64::new(0),
            accounts_retained: AtomicU64::new(0),
            records_skipped: AtomicU64::new(0),
            nodes_built: AtomicU64::new(0),
            links_built: AtomicU64::new(0),
            exclusions_by_reason: RwLock::new(HashMap::new()),
            stage_times: RwLock::new(HashMap::new()),
        }
    }

    /// Record one completed run
    pub fn record_run(
        &self,
        received: usize,
        retained: usize,
        skipped: usize,
        nodes: usize,
        links: usize,
    ) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.accounts_received.fetch_add(received as u64, Ordering::Relaxed);
        self.accounts_retained.fetch_add(retained as u64, Ordering::Relaxed);
        self.records_skipped.fetch_add(skipped as u64, Ordering::Relaxed);
        self.nodes_built.fetch_add(nodes as u64, Ordering::Relaxed);
        self.links_built.fetch_add(links as u64, Ordering::Relaxed);
    }

    /// Record an exclusion
    pub fn record_exclusion(&self, reason_kind: &'static str) {
        if let Ok(mut by_reason) = self.exclusions_by_reason.write() {
            *by_reason.entry(reason_kind).or_insert(0) += 1;
        }
    }

    /// Record a stage duration
    pub fn record_stage(&self, stage: Stage, duration: Duration) {
        if let Ok(mut times) = self.stage_times.write() {
            let stage_times = times.entry(stage).or_default();
            stage_times.push(duration.as_micros() as u64);
            // Keep only last 1000 per stage
            if stage_times.len() > 1000 {
                stage_times.drain(0..500);
            }
        }
    }

    /// Exclusion counts by reason
    pub fn exclusions_by_reason(&self) -> HashMap<&'static str, u64> {
        self.exclusions_by_reason
            .read()
            .map(|by_reason| by_reason.clone())
            .unwrap_or_default()
    }

    /// Mean duration per stage, in microseconds
    pub fn mean_stage_times(&self) -> HashMap<Stage, u64> {
        let Ok(times) = self.stage_times.read() else {
            return HashMap::new();
        };

        times
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(stage, samples)| (*stage, samples.iter().sum::<u64>() / samples.len() as u64))
            .collect()
    }

    /// Share of received accounts removed by the filter (0.0 - 1.0)
    pub fn exclusion_rate(&self) -> f64 {
        let received = self.accounts_received.load(Ordering::Relaxed);
        if received == 0 {
            return 0.0;
        }
        let retained = self.accounts_retained.load(Ordering::Relaxed);
        received.saturating_sub(retained) as f64 / received as f64
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let runs = self.runs.load(Ordering::Relaxed);
        let received = self.accounts_received.load(Ordering::Relaxed);
        let retained = self.accounts_retained.load(Ordering::Relaxed);
        let skipped = self.records_skipped.load(Ordering::Relaxed);
        let nodes = self.nodes_built.load(Ordering::Relaxed);
        let links = self.links_built.load(Ordering::Relaxed);

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              CRIMSONTRACE PIPELINE - RUN SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Runs: {:>6}  │  Malformed records skipped: {:>8}          ║", runs, skipped);
        info!(
            "║ Suspicious: {:>6} received → {:>6} kept ({:>5.1}% removed)   ║",
            received,
            retained,
            self.exclusion_rate() * 100.0
        );
        info!("║ Graph: {:>8} nodes  │  {:>8} links                      ║", nodes, links);
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Exclusions by reason:                                        ║");
        let mut by_reason: Vec<_> = self.exclusions_by_reason().into_iter().collect();
        by_reason.sort();
        for (reason, count) in by_reason {
            info!("║   {:24}: {:>6}                              ║", reason, count);
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        let stage_times = self.mean_stage_times();
        for stage in [Stage::Normalize, Stage::Filter, Stage::Build] {
            if let Some(mean_us) = stage_times.get(&stage) {
                info!("║   {:10} mean={:>8}μs                                 ║", stage.name(), mean_us);
            }
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_run(50, 37, 2, 120, 300);
        metrics.record_exclusion("name_pattern");
        metrics.record_exclusion("name_pattern");
        metrics.record_exclusion("moderate_velocity");

        assert_eq!(metrics.runs.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.records_skipped.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.exclusions_by_reason()["name_pattern"], 2);
        assert!((metrics.exclusion_rate() - 0.26).abs() < 1e-9);
    }

    #[test]
    fn test_stage_times() {
        let metrics = PipelineMetrics::new();

        metrics.record_stage(Stage::Build, Duration::from_micros(100));
        metrics.record_stage(Stage::Build, Duration::from_micros(300));

        let means = metrics.mean_stage_times();
        assert_eq!(means[&Stage::Build], 200);
        assert!(!means.contains_key(&Stage::Filter));
    }

    #[test]
    fn test_empty_exclusion_rate() {
        assert_eq!(PipelineMetrics::new().exclusion_rate(), 0.0);
    }
}
