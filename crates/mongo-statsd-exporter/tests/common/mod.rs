//! Test doubles for driving the scheduler without MongoDB or StatsD.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use mongo_statsd_core::error::{ExporterError, Result};
use mongo_statsd_core::mapper::Gauge;
use mongo_statsd_core::sink::GaugeSink;
use mongo_statsd_core::status::StatusSnapshot;
use mongo_statsd_exporter::source::StatusSource;

/// Replays scripted fetch results, then returns `StatusSnapshot::default()`.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusSnapshot>>>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<StatusSnapshot>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// Number of fetches started.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    fn describe(&self) -> String {
        "scripted".into()
    }

    async fn fetch(&self) -> Result<StatusSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(StatusSnapshot::default()))
    }
}

pub fn fetch_error(msg: &str) -> Result<StatusSnapshot> {
    Err(ExporterError::Fetch(msg.to_string()))
}

/// Records every gauge; optionally refuses one gauge name.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, i64)>>,
    fail_on: Option<&'static str>,
    closes: AtomicUsize,
}

impl RecordingSink {
    pub fn failing_on(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, i64)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl GaugeSink for RecordingSink {
    fn send_gauge(&self, gauge: &Gauge) -> Result<()> {
        if self.fail_on == Some(gauge.name) {
            return Err(ExporterError::Sink(format!("refused {}", gauge.name)));
        }
        self.sent
            .lock()
            .unwrap()
            .push((gauge.name.to_string(), gauge.value));
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Let spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
