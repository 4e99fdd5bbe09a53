//! Command-line / environment surface.
//!
//! Every option can also be given through the environment variable named in
//! its `env` attribute. Options left unset fall back to the YAML file (if
//! `--config` is given) and then to the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use super::schema::FetchErrorPolicy;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "mongo-statsd-exporter",
    version,
    about = "Poll MongoDB serverStatus and forward it to StatsD as gauges"
)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "MONGO_STATSD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Polling interval, e.g. `5s`, `1m30s`, `500ms` [default: 5s]
    #[arg(short, long, env = "UPDATE_INTERVAL")]
    pub interval: Option<String>,

    /// MongoDB connection URL [default: mongodb://localhost:27017]
    #[arg(long, env = "MONGO_URL")]
    pub mongo_url: Option<String>,

    /// StatsD host [default: localhost]
    #[arg(long, env = "STATSD_HOST")]
    pub statsd_host: Option<String>,

    /// StatsD UDP port [default: 8125]
    #[arg(long, env = "STATSD_PORT")]
    pub statsd_port: Option<u16>,

    /// Metric name prefix [default: none]
    #[arg(long, env = "STATSD_PREFIX")]
    pub statsd_prefix: Option<String>,

    /// Hosted Graphite API key, prepended to the prefix
    #[arg(long, env = "HOSTED_GRAPHITE_KEY")]
    pub hosted_graphite_key: Option<String>,

    /// Bound on MongoDB connect and server selection [default: 30s]
    #[arg(long, env = "CONNECT_TIMEOUT")]
    pub connect_timeout: Option<String>,

    /// What a failed status fetch does to the loop [default: skip]
    #[arg(long, env = "ON_FETCH_ERROR", value_enum)]
    pub on_fetch_error: Option<FetchErrorPolicy>,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(
        short,
        long,
        env = "DEBUG",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: bool,
}
