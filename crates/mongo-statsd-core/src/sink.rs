//! The seam between the mapper and whatever client ships gauges out.

use crate::error::Result;
use crate::mapper::Gauge;

/// A destination for gauges. The exporter's StatsD client implements this;
/// tests use recording doubles.
pub trait GaugeSink: Send + Sync {
    /// Emit one gauge.
    fn send_gauge(&self, gauge: &Gauge) -> Result<()>;

    /// Flush and release the underlying client. Called once, at shutdown.
    fn close(&self) -> Result<()>;
}

/// Send `gauges` in order, stopping at the first failure.
///
/// Returns the number of gauges sent. Gauges after the failing one are not
/// attempted for this tick.
pub fn push_gauges(sink: &dyn GaugeSink, gauges: &[Gauge]) -> Result<usize> {
    for (sent, g) in gauges.iter().enumerate() {
        if let Err(e) = sink.send_gauge(g) {
            tracing::debug!(gauge = g.name, sent, error = %e, "gauge send failed, aborting tick");
            return Err(e);
        }
    }
    Ok(gauges.len())
}
