//! Exporter self-observation: how many ticks ran, how they ended, how many
//! gauges went out, how long ticks took.
//!
//! These numbers never go to the sink. They are rendered as one logfmt-style
//! line at shutdown. Counters carry dynamic labels backed by `DashMap`;
//! labels are flattened into sorted key vectors for deterministic output.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Tick outcome label values.
pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_FETCH_ERROR: &str = "fetch_error";
pub const OUTCOME_SEND_ERROR: &str = "send_error";

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let labels = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(",");
                (labels, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();

        for (labels, v) in rows {
            if !out.is_empty() {
                out.push(' ');
            }
            if labels.is_empty() {
                let _ = write!(out, "{name}={v}");
            } else {
                let _ = write!(out, "{name}{{{labels}}}={v}");
            }
        }
    }
}

/// Count/sum/max of observed durations, microsecond resolution.
#[derive(Default)]
pub struct DurationStats {
    count: AtomicU64,
    sum_micros: AtomicU64,
    max_micros: AtomicU64,
}

impl DurationStats {
    pub fn observe(&self, d: Duration) {
        let micros = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
        self.max_micros.fetch_max(micros, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> Duration {
        Duration::from_micros(self.max_micros.load(Ordering::Relaxed))
    }

    pub fn mean(&self) -> Duration {
        let n = self.count();
        if n == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.sum_micros.load(Ordering::Relaxed) / n)
    }
}

/// Totals for one scheduler run, returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks_ok: u64,
    pub fetch_errors: u64,
    pub send_errors: u64,
    pub gauges_sent: u64,
}

impl RunSummary {
    pub fn ticks(&self) -> u64 {
        self.ticks_ok + self.fetch_errors + self.send_errors
    }
}

#[derive(Default)]
pub struct ExporterMetrics {
    pub ticks: CounterVec,
    pub gauges_sent: CounterVec,
    pub tick_duration: DurationStats,
}

impl ExporterMetrics {
    pub fn record_tick(&self, outcome: &str, elapsed: Duration) {
        self.ticks.inc(&[("outcome", outcome)]);
        self.tick_duration.observe(elapsed);
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks_ok: self.ticks.get(&[("outcome", OUTCOME_OK)]),
            fetch_errors: self.ticks.get(&[("outcome", OUTCOME_FETCH_ERROR)]),
            send_errors: self.ticks.get(&[("outcome", OUTCOME_SEND_ERROR)]),
            gauges_sent: self.gauges_sent.get(&[]),
        }
    }

    /// One-line rendering for the shutdown log.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.ticks.render("ticks", &mut out);
        self.gauges_sent.render("gauges_sent", &mut out);
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(
            out,
            "tick_mean_us={} tick_max_us={}",
            self.tick_duration.mean().as_micros(),
            self.tick_duration.max().as_micros()
        );
        out
    }
}
