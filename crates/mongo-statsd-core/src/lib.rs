//! mongo-statsd core: the status document model, the gauge mapper, and the
//! error surface shared by the exporter and its tests.
//!
//! This crate carries no runtime, driver, or socket dependencies. Everything
//! here is a pure transformation from a decoded `serverStatus` document to an
//! ordered list of gauges, plus the [`GaugeSink`] seam the exporter plugs a
//! real StatsD client into.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `ExporterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod mapper;
pub mod sink;
pub mod status;

/// Shared result type.
pub use error::{ErrorKind, ExporterError, Result};
pub use mapper::{gauges, Gauge, GAUGE_COUNT, SAMPLE_RATE};
pub use sink::{push_gauges, GaugeSink};
pub use status::StatusSnapshot;
