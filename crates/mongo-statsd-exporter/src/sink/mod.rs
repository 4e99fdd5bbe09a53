//! Gauge sink implementations.

pub mod statsd;

pub use statsd::StatsdSink;
