//! Forensic report export.
//!
//! The report carries exactly `suspicious_accounts`, `fraud_rings` and
//! `summary`; graph and edge data never leak into it.

use crate::error::{CoreError, Result};
use crate::types::{AnalysisResult, FraudRing, SummaryStats, SuspiciousAccount};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const REPORT_PREFIX: &str = "CrimsonTrace_Forensics_";

/// Borrowed view of the exportable part of an analysis
#[derive(Debug, Serialize)]
pub struct ForensicsReport<'a> {
    pub suspicious_accounts: &'a [SuspiciousAccount],
    pub fraud_rings: &'a [FraudRing],
    pub summary: &'a SummaryStats,
}

impl<'a> ForensicsReport<'a> {
    pub fn from_analysis(analysis: &'a AnalysisResult) -> Self {
        Self {
            suspicious_accounts: &analysis.suspicious_accounts,
            fraud_rings: &analysis.fraud_rings,
            summary: &analysis.summary,
        }
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CoreError::Serialization)
    }
}

/// `CrimsonTrace_Forensics_YYYY-MM-DDTHH-MM-SS.json`
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!("{REPORT_PREFIX}{}.json", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write the report into `dir` and return the file path
pub fn write_report(dir: &Path, analysis: &AnalysisResult, now: DateTime<Utc>) -> Result<PathBuf> {
    let json = ForensicsReport::from_analysis(analysis).to_json()?;

    fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(now));
    fs::write(&path, json)?;

    info!(
        path = %path.display(),
        accounts = analysis.suspicious_accounts.len(),
        rings = analysis.fraud_rings.len(),
        "Report downloaded"
    );

    Ok(path)
}
