//! The tick loop: fetch -> map -> send on a fixed period until shutdown.
//!
//! Two states. `Running` ticks; `ShuttingDown` is terminal: the sink is closed
//! once and the loop returns. A tick that is already running when shutdown
//! arrives finishes before the loop notices.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use mongo_statsd_core::error::Result;
use mongo_statsd_core::mapper::gauges;
use mongo_statsd_core::sink::{push_gauges, GaugeSink};

use crate::config::{ExporterConfig, FetchErrorPolicy};
use crate::obs::metrics::{OUTCOME_FETCH_ERROR, OUTCOME_OK, OUTCOME_SEND_ERROR};
use crate::obs::{ExporterMetrics, RunSummary};
use crate::source::StatusSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    ShuttingDown,
}

pub struct Scheduler {
    period: Duration,
    on_fetch_error: FetchErrorPolicy,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn GaugeSink>,
    metrics: Arc<ExporterMetrics>,
}

impl Scheduler {
    pub fn new(
        period: Duration,
        on_fetch_error: FetchErrorPolicy,
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn GaugeSink>,
    ) -> Self {
        Self {
            period,
            on_fetch_error,
            source,
            sink,
            metrics: Arc::new(ExporterMetrics::default()),
        }
    }

    pub fn from_config(
        cfg: &ExporterConfig,
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn GaugeSink>,
    ) -> Self {
        Self::new(cfg.interval, cfg.on_fetch_error, source, sink)
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Tick every `period` (first tick one period after start) until
    /// `shutdown` fires or a fetch fails under [`FetchErrorPolicy::Exit`].
    ///
    /// The sink is closed before returning on every path.
    pub async fn run(self, shutdown: CancellationToken) -> Result<RunSummary> {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut state = RunState::Running;
        let mut outcome: Result<()> = Ok(());

        tracing::info!(
            source = %self.source.describe(),
            period = ?self.period,
            on_fetch_error = self.on_fetch_error.as_str(),
            "scheduler running"
        );

        while state == RunState::Running {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    state = RunState::ShuttingDown;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        outcome = Err(e);
                        state = RunState::ShuttingDown;
                    }
                }
            }
        }

        tracing::info!("scheduler shutting down");
        if let Err(e) = self.sink.close() {
            tracing::warn!(kind = e.kind().as_str(), error = %e, "closing metrics sink failed");
        }

        outcome.map(|()| self.metrics.summary())
    }

    /// One fetch -> map -> send cycle. Only returns `Err` when the fetch
    /// failed and the policy says to stop.
    pub async fn tick(&self) -> Result<()> {
        let started = Instant::now();

        let snapshot = match self.source.fetch().await {
            Ok(s) => s,
            Err(e) => {
                self.metrics.record_tick(OUTCOME_FETCH_ERROR, started.elapsed());
                return match self.on_fetch_error {
                    FetchErrorPolicy::Skip => {
                        tracing::warn!(kind = e.kind().as_str(), error = %e, "status fetch failed, skipping tick");
                        Ok(())
                    }
                    FetchErrorPolicy::Exit => {
                        tracing::error!(kind = e.kind().as_str(), error = %e, "status fetch failed, stopping");
                        Err(e)
                    }
                };
            }
        };

        let list = gauges(&snapshot);
        match push_gauges(self.sink.as_ref(), &list) {
            Ok(sent) => {
                self.metrics.gauges_sent.add(&[], sent as u64);
                self.metrics.record_tick(OUTCOME_OK, started.elapsed());
                tracing::debug!(
                    host = %snapshot.host,
                    version = %snapshot.version,
                    gauges = sent,
                    elapsed = ?started.elapsed(),
                    "tick complete"
                );
            }
            Err(e) => {
                self.metrics.record_tick(OUTCOME_SEND_ERROR, started.elapsed());
                tracing::warn!(kind = e.kind().as_str(), error = %e, "gauge send failed");
            }
        }
        Ok(())
    }
}
