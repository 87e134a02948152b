//! Registration of every phase's metrics, with name-conflict detection

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Register all metrics from all phases
pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::input::InputMetrics>(&mut all_metrics);
    register_phase_metrics::<super::resolver::ResolverMetrics>(&mut all_metrics);

    info!("Registered {} total metrics across all phases", all_metrics.len());

    for doc in all_metrics.values() {
        debug!(
            phase = extract_phase_from_metric_name(doc.name),
            name = doc.name,
            metric_type = ?doc.metric_type,
            labels = ?doc.labels,
            "{}",
            doc.help
        );
    }
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<String, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' redefined by phase '{}'",
                doc.name, phase_name
            );
        } else {
            all_metrics.insert(doc.name.to_string(), doc);
        }
    }
}

/// "owner_resolver_input_hard_errors_total" -> "input"
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("owner_resolver_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}
