//! Prometheus instrumentation. Every recorder is a no-op without the `metrics` feature.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;
#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

#[cfg(feature = "metrics")]
lazy_static! {
    static ref STREAMED_CHUNKS: IntCounter = register_int_counter!(
        "object_stream_chunks_total",
        "Total number of chunks received across all sessions"
    ).expect("chunk counter registers once");
    static ref STREAMED_BYTES: IntCounter = register_int_counter!(
        "object_stream_bytes_total",
        "Total number of body bytes received across all sessions"
    ).expect("byte counter registers once");
    static ref DECODED_OBJECTS: IntCounter = register_int_counter!(
        "object_stream_decoded_total",
        "Total number of objects decoded, before batch deduplication"
    ).expect("decoded counter registers once");
    static ref DECODE_FAILURES: IntCounter = register_int_counter!(
        "object_stream_decode_failures_total",
        "Total number of spans dropped because they did not decode"
    ).expect("failure counter registers once");
    static ref ACTIVE_SESSIONS: IntGauge = register_int_gauge!(
        "object_stream_active_sessions",
        "Number of sessions currently registered"
    ).expect("session gauge registers once");
}

#[cfg(feature = "metrics")]
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    let metric_families = prometheus::gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

pub(crate) fn record_chunk(_len: usize) {
    #[cfg(feature = "metrics")]
    {
        STREAMED_CHUNKS.inc();
        STREAMED_BYTES.inc_by(_len as u64);
    }
}

pub(crate) fn record_decoded(_count: usize) {
    #[cfg(feature = "metrics")]
    DECODED_OBJECTS.inc_by(_count as u64);
}

pub(crate) fn record_decode_failure() {
    #[cfg(feature = "metrics")]
    DECODE_FAILURES.inc();
}

pub(crate) fn session_opened() {
    #[cfg(feature = "metrics")]
    ACTIVE_SESSIONS.inc();
}

pub(crate) fn session_closed() {
    #[cfg(feature = "metrics")]
    ACTIVE_SESSIONS.dec();
}
