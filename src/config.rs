//! Application configuration.
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `DAQWATCH_`-prefixed environment variables.
//!
//! ```toml
//! endpoint = "http://daq.local:5000"
//! step = 60
//! streams = ["l3", "burst"]
//! ```

use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Configuration for a daqwatch session.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the monitoring server, without a trailing slash.
    pub endpoint: String,
    /// Sampling step for metric queries, in seconds.
    pub step: u64,
    /// Length of the trailing query window, in seconds.
    pub span: u64,
    /// Poll interval for listings, settings and metric refresh, in seconds.
    pub refresh: u64,
    /// HTTP request timeout, in seconds.
    pub timeout: u64,
    /// Names of the processing streams whose file listings are watched.
    pub streams: Vec<String>,
    /// Metric expression prefix for the per-crate series.
    pub crate_metric: String,
    /// Bitmask of crate slots that exist in the current detector setup.
    pub available_crates: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            step: 60,
            span: 4 * 3600,
            refresh: 5,
            timeout: 10,
            streams: vec!["l3".to_string()],
            crate_metric: "crate-rate".to_string(),
            available_crates: (1 << crate::data::mask::CRATE_SLOTS) - 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file, and the
    /// environment (`DAQWATCH_ENDPOINT`, `DAQWATCH_STEP`, ...).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("endpoint", defaults.endpoint)?
            .set_default("step", defaults.step)?
            .set_default("span", defaults.span)?
            .set_default("refresh", defaults.refresh)?
            .set_default("timeout", defaults.timeout)?
            .set_default("streams", defaults.streams)?
            .set_default("crate_metric", defaults.crate_metric)?
            .set_default("available_crates", defaults.available_crates as u64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("DAQWATCH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The endpoint with any trailing slash removed, so URL building can
    /// always join with a plain `/`.
    pub fn endpoint_base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:5000");
        assert_eq!(config.step, 60);
        assert_eq!(config.refresh, 5);
        assert_eq!(config.streams, vec!["l3".to_string()]);
        assert_eq!(config.available_crates, 0xF_FFFF);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "endpoint = \"http://daq.local:5000\"").unwrap();
        writeln!(file, "step = 10").unwrap();
        writeln!(file, "streams = [\"l3\", \"burst\"]").unwrap();
        file.flush().unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.endpoint, "http://daq.local:5000");
        assert_eq!(config.step, 10);
        assert_eq!(config.streams.len(), 2);
        // Untouched keys keep their defaults
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_endpoint_base_strips_trailing_slash() {
        let config = AppConfig {
            endpoint: "http://daq.local:5000/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.endpoint_base(), "http://daq.local:5000");
    }
}
