// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; with no recorder installed every call is a
//! no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all Folio metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "folio_messages_total",
        "Inbound messages by outcome (processed, duplicate, skipped, failed)"
    );
    describe_counter!(
        "folio_tickets_opened_total",
        "Support tickets opened, by category"
    );
    describe_counter!(
        "folio_outbound_total",
        "Outbound reply attempts, by result (ok, error)"
    );
    describe_histogram!(
        "folio_turn_latency_seconds",
        "Time to run one conversation turn, including the reply send"
    );
}

/// Count one inbound message under `outcome`.
pub fn record_message(outcome: &'static str) {
    metrics::counter!("folio_messages_total", "outcome" => outcome).increment(1);
}

/// Count an opened ticket.
pub fn record_ticket_opened(category: &str) {
    metrics::counter!("folio_tickets_opened_total", "category" => category.to_string())
        .increment(1);
}

/// Count an outbound send attempt.
pub fn record_outbound(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("folio_outbound_total", "result" => result).increment(1);
}

/// Record conversation turn latency.
pub fn record_turn_latency(seconds: f64) {
    metrics::histogram!("folio_turn_latency_seconds").record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn helpers_emit_labelled_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            register_metrics();
            record_message("processed");
            record_message("processed");
            record_message("duplicate");
            record_ticket_opened("SOPORTE");
            record_outbound(false);
            record_turn_latency(0.25);
        });

        let out = handle.render();
        assert!(out.contains(r#"folio_messages_total{outcome="processed"} 2"#), "{out}");
        assert!(out.contains(r#"folio_messages_total{outcome="duplicate"} 1"#));
        assert!(out.contains(r#"folio_tickets_opened_total{category="SOPORTE"} 1"#));
        assert!(out.contains(r#"folio_outbound_total{result="error"} 1"#));
        assert!(out.contains("folio_turn_latency_seconds"));
    }
}
