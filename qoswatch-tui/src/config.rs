//! Dashboard configuration.
//!
//! Settings layer in the usual order: built-in defaults, then an optional
//! config file, then `QOSWATCH_`-prefixed environment variables, then CLI
//! flags (applied by the binary after loading).

use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend HTTP endpoint.
    pub endpoint: String,
    /// Event feed address (`host:port`), if the backend exposes one.
    pub events: Option<String>,
    /// Poll interval in seconds.
    pub refresh_secs: u64,
    /// Samples kept per chart series.
    pub window: usize,
    /// Lines kept in the status log.
    pub log_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5432".to_string(),
            events: None,
            refresh_secs: 2,
            window: 20,
            log_capacity: 200,
        }
    }
}

impl DashboardConfig {
    /// Load settings from an optional config file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        // Env values arrive as strings; parse them into the numeric fields
        builder = builder.add_source(Environment::with_prefix("QOSWATCH").try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn defaults_without_file() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:5432");
        assert_eq!(config.refresh_secs, 2);
        assert_eq!(config.window, 20);
        assert!(config.events.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "endpoint = \"http://sim.local:5432\"\nrefresh_secs = 5\nwindow = 40"
        )
        .unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.endpoint, "http://sim.local:5432");
        assert_eq!(config.refresh_secs, 5);
        assert_eq!(config.window, 40);
        // Untouched keys keep their defaults
        assert_eq!(config.log_capacity, 200);
    }
}
