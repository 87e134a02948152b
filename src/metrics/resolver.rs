//! Resolver Phase Metrics
//!
//! Per-property counts of candidates, emitted owners, rejected strings and
//! dropped duplicates, plus resolution timing.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ResolverMetrics;

impl ResolverMetrics {
    /// Record one completed property run
    pub fn record_property_resolved(
        source_id: &str,
        candidates: usize,
        persons: usize,
        companies: usize,
        duration_secs: f64,
    ) {
        let source = source_id.to_string();
        ::metrics::counter!(
            phase_metric!(counter, "resolver", "properties_resolved"),
            "source" => source.clone()
        )
        .increment(1);
        ::metrics::counter!(
            phase_metric!(counter, "resolver", "candidates_seen"),
            "source" => source.clone()
        )
        .increment(candidates as u64);
        ::metrics::counter!(
            phase_metric!(counter, "resolver", "owners_emitted"),
            "source" => source.clone(),
            "kind" => "person"
        )
        .increment(persons as u64);
        ::metrics::counter!(
            phase_metric!(counter, "resolver", "owners_emitted"),
            "source" => source.clone(),
            "kind" => "company"
        )
        .increment(companies as u64);
        ::metrics::histogram!(
            phase_metric!(histogram, "resolver", "duration_seconds"),
            "source" => source
        )
        .record(duration_secs);
    }

    /// Record a string routed to the invalid collector
    pub fn record_invalid(reason: &'static str) {
        ::metrics::counter!(
            phase_metric!(counter, "resolver", "invalid_entries"),
            "reason" => reason
        )
        .increment(1);
    }

    pub fn record_duplicates_dropped(count: usize) {
        if count > 0 {
            ::metrics::counter!(phase_metric!(counter, "resolver", "duplicates_dropped"))
                .increment(count as u64);
        }
    }

    /// Record a sibling surname carried onto a single-token fragment
    pub fn record_surname_inferred() {
        ::metrics::counter!(phase_metric!(counter, "resolver", "surnames_inferred")).increment(1);
    }
}

impl PhaseMetrics for ResolverMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "resolver", "properties_resolved"));
        let _ = counter!(phase_metric!(counter, "resolver", "candidates_seen"));
        let _ = counter!(phase_metric!(counter, "resolver", "owners_emitted"));
        let _ = counter!(phase_metric!(counter, "resolver", "invalid_entries"));
        let _ = counter!(phase_metric!(counter, "resolver", "duplicates_dropped"));
        let _ = counter!(phase_metric!(counter, "resolver", "surnames_inferred"));
        let _ = histogram!(phase_metric!(histogram, "resolver", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "resolver"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "resolver", "properties_resolved"),
                metric_type: MetricType::Counter,
                help: "Total number of properties resolved without a hard error",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "candidates_seen"),
                metric_type: MetricType::Counter,
                help: "Total number of raw owner strings read",
                labels: vec!["source"],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "owners_emitted"),
                metric_type: MetricType::Counter,
                help: "Total number of owners placed in a timeline bucket",
                labels: vec!["source", "kind"],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "invalid_entries"),
                metric_type: MetricType::Counter,
                help: "Total number of owner strings routed to invalid_owners",
                labels: vec!["reason"],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "duplicates_dropped"),
                metric_type: MetricType::Counter,
                help: "Total number of owners dropped as same-bucket duplicates",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "surnames_inferred"),
                metric_type: MetricType::Counter,
                help: "Total number of single-token fragments completed with a sibling surname",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "resolver", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time to resolve one property in seconds",
                labels: vec!["source"],
            },
        ]
    }
}
