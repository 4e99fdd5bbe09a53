//! Lightweight in-process bookkeeping about the exporter itself.
//!
//! Stored as atomics, summarized when the scheduler stops.

pub mod metrics;

pub use metrics::{ExporterMetrics, RunSummary};
