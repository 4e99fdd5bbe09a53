//! Exporter config loader.
//!
//! Precedence, highest first: CLI flag, environment variable (both handled by
//! clap), YAML file, built-in default. The YAML file is parsed strictly.

pub mod cli;
pub mod schema;

use std::fs;
use std::path::Path;
use std::time::Duration;

use mongo_statsd_core::error::{ExporterError, Result};

pub use cli::Cli;
pub use schema::{ExporterConfig, FetchErrorPolicy, FileConfig};

pub fn load_from_file(path: &Path) -> Result<FileConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        ExporterError::Config(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FileConfig> {
    serde_yaml::from_str(s).map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))
}

/// Resolve the final configuration from parsed arguments, reading the YAML
/// file they point at, if any.
pub fn resolve(cli: &Cli) -> Result<ExporterConfig> {
    let file = match &cli.config {
        Some(path) => load_from_file(path)?,
        None => FileConfig::default(),
    };
    merge(cli, file)
}

/// Layer `cli` over `file` over defaults, then validate.
pub fn merge(cli: &Cli, file: FileConfig) -> Result<ExporterConfig> {
    let d = ExporterConfig::default();

    let interval = match cli.interval.as_deref().or(file.interval.as_deref()) {
        Some(s) => parse_duration("interval", s)?,
        None => d.interval,
    };
    let connect_timeout = match cli
        .connect_timeout
        .as_deref()
        .or(file.connect_timeout.as_deref())
    {
        Some(s) => parse_duration("connect_timeout", s)?,
        None => d.connect_timeout,
    };

    let cfg = ExporterConfig {
        interval,
        mongo_url: cli.mongo_url.clone().or(file.mongo_url).unwrap_or(d.mongo_url),
        statsd_host: cli.statsd_host.clone().or(file.statsd_host).unwrap_or(d.statsd_host),
        statsd_port: cli.statsd_port.or(file.statsd_port).unwrap_or(d.statsd_port),
        statsd_prefix: cli
            .statsd_prefix
            .clone()
            .or(file.statsd_prefix)
            .unwrap_or(d.statsd_prefix),
        hosted_graphite_key: cli
            .hosted_graphite_key
            .clone()
            .or(file.hosted_graphite_key)
            .filter(|k| !k.is_empty()),
        connect_timeout,
        on_fetch_error: cli.on_fetch_error.or(file.on_fetch_error).unwrap_or(d.on_fetch_error),
        debug: cli.debug || file.debug.unwrap_or(false),
    };

    cfg.validate()?;
    Ok(cfg)
}

/// Parse a human-readable duration (`5s`, `1m30s`, `250ms`). A bare number
/// has no unit and is rejected.
pub fn parse_duration(key: &str, s: &str) -> Result<Duration> {
    humantime::parse_duration(s.trim())
        .map_err(|e| ExporterError::Config(format!("invalid {key} {s:?}: {e}")))
}
