//! mongo-statsd exporter library entry.
//!
//! Wires configuration, the MongoDB status source, the StatsD sink and the
//! tick scheduler into one process. Consumed by the binary (`main.rs`) and by
//! integration tests, which drive [`scheduler::Scheduler`] with test doubles.

pub mod app;
pub mod config;
pub mod obs;
pub mod scheduler;
pub mod shutdown;
pub mod sink;
pub mod source;
