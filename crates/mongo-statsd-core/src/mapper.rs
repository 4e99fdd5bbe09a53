//! Flattening a [`StatusSnapshot`] into the fixed gauge list.
//!
//! The list is ordered by category (connections, opcounters, memory, global
//! lock, extra info) and every value is the snapshot field verbatim. The
//! replica-set opcounters are intentionally absent.

use crate::status::StatusSnapshot;

/// Sample rate attached to every gauge. Gauges are absolute snapshots, so
/// nothing is ever sampled.
pub const SAMPLE_RATE: f64 = 1.0;

/// Number of gauges produced per snapshot.
pub const GAUGE_COUNT: usize = 23;

/// One point-in-time value destined for the metrics sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    pub name: &'static str,
    pub value: i64,
    pub sample_rate: f64,
}

impl Gauge {
    fn new(name: &'static str, value: i64) -> Self {
        Self {
            name,
            value,
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// Map a snapshot to its ordered gauge list.
pub fn gauges(status: &StatusSnapshot) -> Vec<Gauge> {
    let c = &status.connections;
    let ops = &status.opcounters;
    let mem = &status.mem;
    let gl = &status.global_lock;
    let extra = &status.extra_info;

    vec![
        Gauge::new("connections.current", c.current),
        Gauge::new("connections.available", c.available),
        Gauge::new("connections.created", c.total_created),
        // primary opcounters only; opcounters_repl is not emitted
        Gauge::new("ops.inserts", ops.insert),
        Gauge::new("ops.queries", ops.query),
        Gauge::new("ops.updates", ops.update),
        Gauge::new("ops.deletes", ops.delete),
        Gauge::new("ops.getmores", ops.getmore),
        Gauge::new("ops.commands", ops.command),
        Gauge::new("mem.resident", mem.resident),
        Gauge::new("mem.virtual", mem.r#virtual),
        Gauge::new("mem.mapped", mem.mapped),
        Gauge::new("mem.mapped_with_journal", mem.mapped_with_journal),
        Gauge::new("global_lock.total_time", gl.total_time),
        Gauge::new("global_lock.lock_time", gl.lock_time),
        Gauge::new("global_lock.active_readers", gl.active_clients.readers),
        Gauge::new("global_lock.active_writers", gl.active_clients.writers),
        Gauge::new("global_lock.active_total", gl.active_clients.total),
        Gauge::new("global_lock.queued_readers", gl.current_queue.readers),
        Gauge::new("global_lock.queued_writers", gl.current_queue.writers),
        Gauge::new("global_lock.queued_total", gl.current_queue.total),
        Gauge::new("extra.page_faults", extra.page_faults),
        Gauge::new("extra.heap_usage", extra.heap_usage_bytes),
    ]
}
