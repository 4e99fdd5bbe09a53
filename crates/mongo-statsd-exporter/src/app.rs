//! Process lifecycle: build the sink and source, run the scheduler in the
//! background, stop it on a signal.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use mongo_statsd_core::error::{ExporterError, Result};
use mongo_statsd_core::sink::GaugeSink;

use crate::config::ExporterConfig;
use crate::obs::RunSummary;
use crate::scheduler::Scheduler;
use crate::shutdown;
use crate::sink::StatsdSink;
use crate::source::{MongoStatusSource, StatusSource};

/// Run until a termination signal arrives (Ok) or the scheduler stops on its
/// own because of a fatal fetch error (Err).
pub async fn run(cfg: ExporterConfig) -> Result<RunSummary> {
    let prefix = cfg.metric_prefix();
    let sink = StatsdSink::connect(&cfg.statsd_host, cfg.statsd_port, &prefix)?;

    tracing::info!(
        statsd = %cfg.statsd_addr(),
        prefix = %prefix,
        interval = %humantime::format_duration(cfg.interval),
        "sending stats"
    );

    let source = MongoStatusSource::new(cfg.mongo_url.clone(), cfg.connect_timeout);
    run_until(&cfg, Arc::new(source), Arc::new(sink), shutdown::wait_for_signal).await
}

/// Drive the scheduler until `signal` resolves or the loop stops by itself.
///
/// `signal` is called once per wait. The first signal lets the in-flight tick
/// finish; a second one before the scheduler returns aborts it, and the sink
/// is closed here instead. A signal that fails to install still stops the
/// scheduler and the error is returned.
pub async fn run_until<F, Fut>(
    cfg: &ExporterConfig,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn GaugeSink>,
    mut signal: F,
) -> Result<RunSummary>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<&'static str>>,
{
    let scheduler = Scheduler::from_config(cfg, source, Arc::clone(&sink));
    let metrics = scheduler.metrics();

    let token = CancellationToken::new();
    let mut handle = tokio::spawn(scheduler.run(token.clone()));

    let mut signal_err = None;
    let joined = tokio::select! {
        res = &mut handle => Some(res),
        sig = signal() => {
            match sig {
                Ok(name) => tracing::info!(signal = name, "received signal, finishing current tick"),
                Err(e) => signal_err = Some(e),
            }
            token.cancel();

            tokio::select! {
                res = &mut handle => Some(res),
                Ok(name) = signal() => {
                    tracing::warn!(signal = name, "received second signal, abandoning current tick");
                    handle.abort();
                    match (&mut handle).await {
                        Err(e) if e.is_cancelled() => None,
                        res => Some(res),
                    }
                }
            }
        }
    };

    let outcome = match joined {
        Some(res) => res.map_err(|e| ExporterError::Internal(format!("scheduler task: {e}")))?,
        None => {
            // the aborted scheduler never reached its own close
            if let Err(e) = sink.close() {
                tracing::warn!(kind = e.kind().as_str(), error = %e, "closing metrics sink failed");
            }
            Ok(metrics.summary())
        }
    };
    tracing::info!(summary = %metrics.render(), "exporter stopped");

    if let Some(e) = signal_err {
        return Err(e);
    }
    outcome
}
