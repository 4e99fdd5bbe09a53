//! Typed view of the `serverStatus` document.
//!
//! Only the sections the mapper reads (plus a few identity fields used for
//! logging) are modelled; every other key in the document is ignored.
//!
//! Numeric decoding is lenient: the server reports some counters as int32,
//! some as int64 and, depending on version and storage engine, a few as
//! doubles. All of them land in `i64` (doubles truncate toward zero). Missing
//! keys and missing sections decode as zero so that a snapshot from a
//! WiredTiger server (no `mem.mapped`) or a platform without
//! `extra_info.heap_usage_bytes` still maps to the full gauge list.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// One decoded `serverStatus` document. Fetched per tick, consumed by the
/// mapper, then dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub host: String,
    pub version: String,
    pub process: String,
    #[serde(deserialize_with = "de_i64")]
    pub pid: i64,
    #[serde(deserialize_with = "de_i64")]
    pub uptime: i64,
    #[serde(rename = "uptimeMillis", deserialize_with = "de_i64")]
    pub uptime_millis: i64,
    #[serde(rename = "uptimeEstimate", deserialize_with = "de_i64")]
    pub uptime_estimate: i64,

    pub connections: Connections,
    pub extra_info: ExtraInfo,
    pub mem: Mem,
    #[serde(rename = "globalLock")]
    pub global_lock: GlobalLock,
    pub opcounters: Opcounters,
    /// Replica-set opcounters. Decoded but never emitted as gauges.
    #[serde(rename = "opcountersRepl")]
    pub opcounters_repl: Opcounters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Connections {
    #[serde(deserialize_with = "de_i64")]
    pub current: i64,
    #[serde(deserialize_with = "de_i64")]
    pub available: i64,
    #[serde(deserialize_with = "de_i64")]
    pub total_created: i64,
}

/// Memory figures as reported by the server (megabytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mem {
    #[serde(deserialize_with = "de_i64")]
    pub resident: i64,
    #[serde(deserialize_with = "de_i64")]
    pub r#virtual: i64,
    #[serde(deserialize_with = "de_i64")]
    pub mapped: i64,
    #[serde(deserialize_with = "de_i64")]
    pub mapped_with_journal: i64,
}

/// Reader/writer/total triple used by both lock queues and active clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadersWriters {
    #[serde(deserialize_with = "de_i64")]
    pub readers: i64,
    #[serde(deserialize_with = "de_i64")]
    pub writers: i64,
    #[serde(deserialize_with = "de_i64")]
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalLock {
    #[serde(deserialize_with = "de_i64")]
    pub total_time: i64,
    #[serde(deserialize_with = "de_i64")]
    pub lock_time: i64,
    pub current_queue: ReadersWriters,
    pub active_clients: ReadersWriters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Opcounters {
    #[serde(deserialize_with = "de_i64")]
    pub insert: i64,
    #[serde(deserialize_with = "de_i64")]
    pub query: i64,
    #[serde(deserialize_with = "de_i64")]
    pub update: i64,
    #[serde(deserialize_with = "de_i64")]
    pub delete: i64,
    #[serde(deserialize_with = "de_i64")]
    pub getmore: i64,
    #[serde(deserialize_with = "de_i64")]
    pub command: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtraInfo {
    #[serde(deserialize_with = "de_i64")]
    pub page_faults: i64,
    #[serde(deserialize_with = "de_i64")]
    pub heap_usage_bytes: i64,
}

fn de_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientI64)
}

struct LenientI64;

impl<'de> Visitor<'de> for LenientI64 {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or floating point number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("counter {v} overflows i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<i64, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("counter {v} is not finite")));
        }
        Ok(v.trunc() as i64)
    }

    // explicit null
    fn visit_unit<E: de::Error>(self) -> std::result::Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<i64, E> {
        Ok(0)
    }
}
