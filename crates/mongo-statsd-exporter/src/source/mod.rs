//! Where status snapshots come from.
//!
//! The scheduler only sees [`StatusSource`]; the MongoDB driver lives behind
//! [`MongoStatusSource`].

pub mod mongo;

use async_trait::async_trait;

use mongo_statsd_core::error::Result;
use mongo_statsd_core::status::StatusSnapshot;

pub use mongo::MongoStatusSource;

/// Produces one fresh snapshot per call. Implementations hold no state
/// between calls.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Short description for logs. Must not leak credentials.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<StatusSnapshot>;
}
