//! Analysis payload sources.
//!
//! The pipeline never fetches anything itself: it is handed the bytes of an
//! already-received analysis response, or the mock response when the caller
//! asks for it.

use crate::config::SourceConfig;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Mock analysis response bundled with the crate
pub const MOCK_RESPONSE: &str = include_str!("../fixtures/mock_response.json");

/// Where to read the raw analysis payload from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Mock response, from a fixture file or the bundled one
    Mock { fixture: Option<PathBuf> },
    /// Captured response on disk
    File(PathBuf),
    /// Captured response piped on stdin
    Stdin,
}

impl PayloadSource {
    /// Pick a source from configuration and an optional input argument.
    ///
    /// `-` selects stdin. Mock mode wins over an input path.
    pub fn resolve(config: &SourceConfig, input: Option<&str>) -> Result<Self> {
        if config.use_mock {
            return Ok(PayloadSource::Mock {
                fixture: config.fixture_path.as_ref().map(PathBuf::from),
            });
        }

        match input {
            Some("-") => Ok(PayloadSource::Stdin),
            Some(path) => Ok(PayloadSource::File(PathBuf::from(path))),
            None => bail!("No analysis payload given: pass an input file or enable source.use_mock"),
        }
    }

    /// Read the raw payload bytes
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            PayloadSource::Mock { fixture: None } => {
                info!("Using bundled mock analysis response");
                Ok(MOCK_RESPONSE.as_bytes().to_vec())
            }
            PayloadSource::Mock {
                fixture: Some(path),
            } => {
                info!(path = %path.display(), "Using mock analysis response");
                std::fs::read(path)
                    .with_context(|| format!("Failed to read mock fixture {}", path.display()))
            }
            PayloadSource::File(path) => {
                info!(path = %path.display(), "Reading analysis payload");
                std::fs::read(path)
                    .with_context(|| format!("Failed to read payload {}", path.display()))
            }
            PayloadSource::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("Failed to read payload from stdin")?;
                Ok(buf)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawAnalysisResult;

    #[test]
    fn test_mock_wins_over_input() {
        let config = SourceConfig {
            use_mock: true,
            fixture_path: None,
        };
        let source = PayloadSource::resolve(&config, Some("payload.json")).unwrap();
        assert_eq!(source, PayloadSource::Mock { fixture: None });
    }

    #[test]
    fn test_input_resolution() {
        let config = SourceConfig::default();

        assert_eq!(
            PayloadSource::resolve(&config, Some("-")).unwrap(),
            PayloadSource::Stdin
        );
        assert_eq!(
            PayloadSource::resolve(&config, Some("out/run.json")).unwrap(),
            PayloadSource::File(PathBuf::from("out/run.json"))
        );
        assert!(PayloadSource::resolve(&config, None).is_err());
    }

    #[test]
    fn test_bundled_mock_parses() {
        let bytes = PayloadSource::Mock { fixture: None }.read().unwrap();
        let raw = RawAnalysisResult::from_slice(&bytes).unwrap();
        let len = |field: Option<serde_json::Value>| {
            field.and_then(|v| v.as_array().map(Vec::len))
        };
        assert_eq!(len(raw.suspicious_accounts), Some(17));
        assert_eq!(len(raw.fraud_rings), Some(8));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = PayloadSource::File(PathBuf::from("no/such/payload.json"));
        assert!(source.read().is_err());
    }
}
