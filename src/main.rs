//! CrimsonTrace - Main Entry Point
//!
//! Reads a fraud-analysis response, filters false positives, builds the
//! account graph and optionally writes the forensic report.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crimson_trace::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH};
use crimson_trace::export::write_report;
use crimson_trace::graph::GraphData;
use crimson_trace::pipeline::{Pipeline, PipelineOutput};
use crimson_trace::source::PayloadSource;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "crimson-trace")]
#[command(about = "Fraud ring graph construction and false-positive filtering")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Analysis response to read (`-` for stdin)
    #[arg(short, long)]
    input: Option<String>,

    /// Use the mock analysis response
    #[arg(long)]
    mock: bool,

    /// Keep only suspicious nodes in the written graph
    #[arg(long)]
    ghost: bool,

    /// Keep only the members of one ring in the written graph
    #[arg(long, value_name = "RING_ID")]
    ring: Option<String>,

    /// Write the graph as JSON to this path
    #[arg(long, value_name = "PATH")]
    graph_out: Option<PathBuf>,

    /// Write the forensic report to the configured output directory
    #[arg(long)]
    export: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if cli.mock {
        config.source.use_mock = true;
    }

    init_logging(&config.logging)?;

    info!("Starting CrimsonTrace");
    info!(
        "Filter: high_velocity below {:.1}, business hours {}-{}, behavioral check {}",
        config.filter.high_velocity_max_score,
        config.filter.business_hours_start,
        config.filter.business_hours_end,
        if config.filter.behavioral_check { "on" } else { "off" }
    );

    let source = PayloadSource::resolve(&config.source, cli.input.as_deref())?;
    let payload = source.read()?;

    let pipeline = Pipeline::new(&config);
    let output = pipeline
        .run_bytes(&payload)
        .context("Failed to process analysis payload")?;

    report(&output, &config);

    if let Some(path) = &cli.graph_out {
        let graph = select_view(&output.graph, cli.ghost, cli.ring.as_deref());
        write_graph(path, &graph)?;
    }

    if cli.export {
        let path = write_report(
            Path::new(&config.export.output_dir),
            &output.analysis,
            Utc::now(),
        )?;
        info!("Forensic report written to {}", path.display());
    }

    pipeline.metrics().print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("crimson_trace={}", logging.level).parse()?);

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn report(output: &PipelineOutput, config: &AppConfig) {
    let summary = &output.analysis.summary;
    info!(
        "Analyzed {} accounts: {} flagged, {} rings in {:.2}s",
        summary.total_accounts_analyzed,
        summary.suspicious_accounts_flagged,
        summary.fraud_rings_detected,
        summary.processing_time_seconds
    );

    for skipped in &output.skipped {
        warn!(error = %skipped, "Skipped malformed record");
    }

    for exclusion in &output.excluded {
        info!(
            account_id = %exclusion.account_id,
            reason = %exclusion.reason,
            "Excluded as false positive"
        );
    }

    for ring in &output.analysis.fraud_rings {
        let level = ring.risk_level(&config.risk_levels);
        let flagged = output.analysis.ring_members_flagged(&ring.ring_id);
        info!(
            ring_id = %ring.ring_id,
            pattern = %ring.pattern_type,
            risk_score = ring.risk_score,
            risk = level.label(),
            members = ring.member_accounts.len(),
            flagged = flagged.len(),
            "Fraud ring"
        );
    }
}

fn select_view(graph: &GraphData, ghost: bool, ring: Option<&str>) -> GraphData {
    let graph = match ring {
        Some(ring_id) => {
            let view = graph.ring_view(ring_id);
            if view.nodes.is_empty() {
                warn!(ring_id, "Ring has no flagged members in the graph");
            }
            view
        }
        None => graph.clone(),
    };

    if ghost {
        graph.ghost_view()
    } else {
        graph
    }
}

fn write_graph(path: &Path, graph: &GraphData) -> Result<()> {
    let json = serde_json::to_string_pretty(graph).context("Failed to serialize graph")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write graph to {}", path.display()))?;

    info!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "Graph written"
    );
    Ok(())
}
