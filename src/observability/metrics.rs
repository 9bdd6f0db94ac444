//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rtm_session_starts_total` (counter): session start attempts by outcome
//! - `rtm_envelopes_received_total` (counter): decoded envelopes by type;
//!   tags outside [`KNOWN_ENVELOPE_TYPES`] are counted as `other`
//! - `rtm_reader_stops_total` (counter): reader exits by reason
//! - `rtm_close_handshakes_total` (counter): close frames sent

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_session_start(outcome: &'static str) {
    counter!("rtm_session_starts_total", "outcome" => outcome).increment(1);
}

/// Envelope type tags recorded under their own label value.
pub const KNOWN_ENVELOPE_TYPES: &[&str] = &[
    "hello",
    "message",
    "presence_change",
    "user_typing",
    "channel_joined",
    "channel_created",
    "im_created",
    "team_join",
    "reconnect_url",
    "pong",
    "goodbye",
    "error",
];

/// Label value for an envelope type tag. The peer picks the tag, so the
/// label set is capped.
pub fn envelope_type_label(kind: &str) -> &'static str {
    KNOWN_ENVELOPE_TYPES
        .iter()
        .find(|known| **known == kind)
        .copied()
        .unwrap_or("other")
}

pub fn record_envelope(kind: &str) {
    counter!("rtm_envelopes_received_total", "type" => envelope_type_label(kind)).increment(1);
}

pub fn record_reader_stop(reason: &'static str) {
    counter!("rtm_reader_stops_total", "reason" => reason).increment(1);
}

pub fn record_close_handshake() {
    counter!("rtm_close_handshakes_total").increment(1);
}
