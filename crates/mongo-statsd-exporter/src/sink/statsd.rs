//! StatsD gauge sink backed by `cadence`.
//!
//! One UDP datagram per gauge, no buffering. The socket is non-blocking, so a
//! send never stalls the tick.

use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};

use cadence::prelude::*;
use cadence::{StatsdClient, UdpMetricSink};

use mongo_statsd_core::error::{ExporterError, Result};
use mongo_statsd_core::mapper::Gauge;
use mongo_statsd_core::sink::GaugeSink;

pub struct StatsdSink {
    client: StatsdClient,
    closed: AtomicBool,
}

impl StatsdSink {
    /// Bind a local UDP socket and target `host:port`. Keys are emitted as
    /// `<prefix>.<gauge>` (bare gauge name when `prefix` is empty).
    pub fn connect(host: &str, port: u16, prefix: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| ExporterError::Sink(format!("bind udp socket failed: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| ExporterError::Sink(format!("set_nonblocking failed: {e}")))?;

        let sink = UdpMetricSink::from((host, port), socket)
            .map_err(|e| ExporterError::Sink(format!("resolve {host}:{port} failed: {e}")))?;

        Ok(Self::from_client(StatsdClient::from_sink(prefix, sink)))
    }

    pub fn from_client(client: StatsdClient) -> Self {
        Self {
            client,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl GaugeSink for StatsdSink {
    fn send_gauge(&self, gauge: &Gauge) -> Result<()> {
        if self.is_closed() {
            return Err(ExporterError::Sink("sink is closed".into()));
        }
        // cadence frames gauges without a rate suffix, which is what rate 1.0 means
        if gauge.sample_rate < 1.0 {
            return Err(ExporterError::Sink(format!(
                "gauge {} has sample rate {}, gauges are never sampled",
                gauge.name, gauge.sample_rate
            )));
        }
        // a signed statsd gauge ("-5|g") is a relative adjustment, not a value
        let Ok(value) = u64::try_from(gauge.value) else {
            tracing::warn!(gauge = gauge.name, value = gauge.value, "skipping negative gauge");
            return Ok(());
        };

        self.client
            .gauge(gauge.name, value)
            .map(|_| ())
            .map_err(|e| ExporterError::Sink(format!("send {} failed: {e}", gauge.name)))
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.client
            .flush()
            .map_err(|e| ExporterError::Sink(format!("flush failed: {e}")))
    }
}
