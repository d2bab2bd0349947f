//! Configuration management for the forensics pipeline

use crate::filter::FilterSettings;
use crate::graph::GraphSettings;
use crate::types::ring::RiskLevelThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub filter: FilterSettings,
    pub graph: GraphSettings,
    pub risk_levels: RiskLevelThresholds,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Where the analysis payload comes from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Use the mock analysis response instead of a captured payload
    pub use_mock: bool,
    /// Mock response file; the embedded fixture is used when unset
    pub fixture_path: Option<String>,
}

/// Report export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving forensic reports
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_path(path)
        } else {
            info!(path = %path.display(), "Configuration file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.source.use_mock);
        assert_eq!(config.filter.high_velocity_max_score, 70.0);
        assert_eq!(config.filter.min_account_edges, 10);
        assert_eq!(config.graph.ring_palette.len(), 8);
        assert_eq!(config.graph.base_node_size, 5.0);
        assert_eq!(config.risk_levels.critical, 85.0);
        assert_eq!(config.export.output_dir, ".");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[source]\nuse_mock = true\n\n[filter]\nbehavioral_check = false\n\n[graph]\nring_palette = [\"#111111\"]"
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert!(config.source.use_mock);
        assert!(!config.filter.behavioral_check);
        assert_eq!(config.filter.max_amount_spread, 100.0);
        assert_eq!(config.graph.ring_palette, vec!["#111111".to_string()]);
        assert_eq!(config.graph.base_node_size, 5.0);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = AppConfig::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.filter.business_hours_end, 17);
    }
}
