use std::time::Duration;

use serde::Deserialize;
use mongo_statsd_core::error::{ExporterError, Result};

/// YAML file layout. Every key is optional; unknown keys are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub mongo_url: Option<String>,
    #[serde(default)]
    pub statsd_host: Option<String>,
    #[serde(default)]
    pub statsd_port: Option<u16>,
    #[serde(default)]
    pub statsd_prefix: Option<String>,
    #[serde(default)]
    pub hosted_graphite_key: Option<String>,
    #[serde(default)]
    pub connect_timeout: Option<String>,
    #[serde(default)]
    pub on_fetch_error: Option<FetchErrorPolicy>,
    #[serde(default)]
    pub debug: Option<bool>,
}

/// What the scheduler does when a snapshot cannot be fetched or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Log, count, and wait for the next tick.
    #[default]
    Skip,
    /// Stop the loop and exit non-zero.
    Exit,
}

impl FetchErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchErrorPolicy::Skip => "skip",
            FetchErrorPolicy::Exit => "exit",
        }
    }
}

/// Fully resolved exporter configuration. Built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    pub interval: Duration,
    pub mongo_url: String,
    pub statsd_host: String,
    pub statsd_port: u16,
    pub statsd_prefix: String,
    pub hosted_graphite_key: Option<String>,
    pub connect_timeout: Duration,
    pub on_fetch_error: FetchErrorPolicy,
    pub debug: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            mongo_url: default_mongo_url(),
            statsd_host: default_statsd_host(),
            statsd_port: default_statsd_port(),
            statsd_prefix: String::new(),
            hosted_graphite_key: None,
            connect_timeout: default_connect_timeout(),
            on_fetch_error: FetchErrorPolicy::default(),
            debug: false,
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ExporterError::Config("interval must be greater than zero".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(ExporterError::Config(
                "connect_timeout must be greater than zero".into(),
            ));
        }
        if self.mongo_url.trim().is_empty() {
            return Err(ExporterError::Config("mongo_url must not be empty".into()));
        }
        if self.statsd_host.trim().is_empty() {
            return Err(ExporterError::Config("statsd_host must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port` of the StatsD daemon.
    pub fn statsd_addr(&self) -> String {
        format!("{}:{}", self.statsd_host, self.statsd_port)
    }

    /// Metric prefix: hosted graphite key and statsd prefix joined with `.`,
    /// empty segments dropped.
    pub fn metric_prefix(&self) -> String {
        [self.hosted_graphite_key.as_deref(), Some(self.statsd_prefix.as_str())]
            .into_iter()
            .flatten()
            .map(|s| s.trim_matches('.'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }
}

pub(crate) fn default_interval() -> Duration {
    Duration::from_secs(5)
}
pub(crate) fn default_mongo_url() -> String {
    "mongodb://localhost:27017".into()
}
pub(crate) fn default_statsd_host() -> String {
    "localhost".into()
}
pub(crate) fn default_statsd_port() -> u16 {
    8125
}
pub(crate) fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}
