//! Top-level facade crate for mongo-statsd.
//!
//! Re-exports the core model and the exporter library so users can depend on a single crate.

pub mod core {
    pub use mongo_statsd_core::*;
}

pub mod exporter {
    pub use mongo_statsd_exporter::*;
}
