//! Runtime settings.
//!
//! Layered: built-in defaults, then an optional config file, then
//! `PULSEWATCH_*` environment variables. CLI flags override on top of
//! this in the binary.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::poll::FetchWindows;

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the monitoring backend.
    pub base_url: String,
    /// Seconds between refresh ticks.
    pub refresh_secs: u64,
    /// Availability lookback window in hours.
    pub availability_hours: u32,
    /// Timeseries lookback window in minutes.
    pub timeseries_minutes: u32,
    /// Maximum number of alerts to fetch per cycle.
    pub alerts_limit: u32,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            refresh_secs: 5,
            availability_hours: 24,
            timeseries_minutes: 60,
            alerts_limit: 20,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from an optional config file and the environment.
    ///
    /// Environment variables use the `PULSEWATCH_` prefix, e.g.
    /// `PULSEWATCH_BASE_URL`. Fields not set anywhere keep their
    /// defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(Environment::with_prefix("PULSEWATCH")).build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Period of the refresh tick.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    /// Timeout applied to every backend request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Lookback windows handed to the refresh engine.
    pub fn fetch_windows(&self) -> FetchWindows {
        FetchWindows {
            availability_hours: self.availability_hours,
            timeseries_minutes: self.timeseries_minutes,
            alerts_limit: self.alerts_limit,
        }
    }
}
