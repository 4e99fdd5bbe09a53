//! mongo-statsd-exporter
//!
//! Polls MongoDB `serverStatus` every interval and forwards connection,
//! opcounter, memory, global lock and extra-info figures to StatsD as gauges.
//! Stops cleanly on SIGINT / SIGTERM / SIGQUIT.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mongo_statsd_exporter::{app, config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = config::Cli::parse();

    // resolved before tracing so a config-file `debug: true` applies
    let cfg = config::resolve(&cli);
    let debug = cfg.as_ref().map(|c| c.debug).unwrap_or(cli.debug);
    init_tracing(debug);

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match app::run(cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), error = %e, "exporter failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).init();
}
