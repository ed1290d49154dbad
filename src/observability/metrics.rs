//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_submissions_total` (counter): pipeline runs by outcome
//!   (`delivered`, `rejected`, `invalid`, `log_failed`)
//! - `relay_forward_duration_seconds` (histogram): outbound POST latency
//! - `relay_forward_total` (counter): outbound POSTs by `success`
//! - `relay_log_entries_total` (counter): entries appended to the submission log
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Final outcome of one pipeline run.
pub fn record_submission(outcome: &'static str) {
    counter!("relay_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_forward(success: bool, start: Instant) {
    let success = if success { "true" } else { "false" };
    counter!("relay_forward_total", "success" => success).increment(1);
    histogram!("relay_forward_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_log_append() {
    counter!("relay_log_entries_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    #[derive(Default)]
    struct NameRecorder {
        names: Mutex<Vec<String>>,
    }

    impl NameRecorder {
        fn note(&self, key: &Key) {
            self.names.lock().unwrap().push(key.name().to_string());
        }
    }

    impl Recorder for NameRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            self.note(key);
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            self.note(key);
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            self.note(key);
            Histogram::noop()
        }
    }

    #[test]
    fn test_metric_names() {
        let recorder = NameRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            record_submission("delivered");
            record_forward(false, Instant::now());
            record_log_append();
        });

        assert_eq!(
            *recorder.names.lock().unwrap(),
            vec![
                "relay_submissions_total",
                "relay_forward_total",
                "relay_forward_duration_seconds",
                "relay_log_entries_total",
            ]
        );
    }
}
