//! Input Phase Metrics
//!
//! Property documents read by the batch runner and hard errors that aborted
//! a property.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct InputMetrics;

impl InputMetrics {
    pub fn record_document_loaded(bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "input", "documents_loaded")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "input", "document_bytes"))
            .record(bytes as f64);
    }

    /// Record a property aborted by a hard error
    pub fn record_hard_error(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "input", "hard_errors"), "kind" => kind)
            .increment(1);
    }

    pub fn record_batch(documents: usize, failed: usize) {
        ::metrics::counter!(phase_metric!(counter, "input", "batches")).increment(1);
        ::metrics::gauge!(phase_metric!(gauge, "input", "last_batch_documents"))
            .set(documents as f64);
        ::metrics::gauge!(phase_metric!(gauge, "input", "last_batch_failures"))
            .set(failed as f64);
    }
}

impl PhaseMetrics for InputMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge, histogram};

        let _ = counter!(phase_metric!(counter, "input", "documents_loaded"));
        let _ = counter!(phase_metric!(counter, "input", "hard_errors"));
        let _ = counter!(phase_metric!(counter, "input", "batches"));
        let _ = histogram!(phase_metric!(histogram, "input", "document_bytes"));
        let _ = gauge!(phase_metric!(gauge, "input", "last_batch_documents"));
        let _ = gauge!(phase_metric!(gauge, "input", "last_batch_failures"));
    }

    fn phase_name() -> &'static str {
        "input"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "input", "documents_loaded"),
                metric_type: MetricType::Counter,
                help: "Total number of property documents read",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "input", "hard_errors"),
                metric_type: MetricType::Counter,
                help: "Total number of properties aborted by a hard error",
                labels: vec!["kind"],
            },
            MetricDoc {
                name: phase_metric!(counter, "input", "batches"),
                metric_type: MetricType::Counter,
                help: "Total number of batch runs",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "input", "document_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of property documents in bytes",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "input", "last_batch_documents"),
                metric_type: MetricType::Gauge,
                help: "Documents in the most recent batch",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "input", "last_batch_failures"),
                metric_type: MetricType::Gauge,
                help: "Documents that failed in the most recent batch",
                labels: vec![],
            },
        ]
    }
}
