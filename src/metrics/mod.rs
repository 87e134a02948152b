//! Metrics for the owner resolution engine
//!
//! Each phase defines its metrics in its own submodule. Everything goes
//! through the `metrics` facade, so without an installed recorder every call
//! is a no-op; the library and its tests never need one. The CLI installs a
//! Prometheus recorder and renders a snapshot at exit.

pub mod input;
pub mod registry;
pub mod resolver;

pub use input::InputMetrics;
pub use resolver::ResolverMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the in-process Prometheus recorder and register all phase metrics.
///
/// Idempotent. No HTTP listener is started; the snapshot is pulled with
/// [`render`].
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("METRICS: Prometheus handle was already set");
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
}

/// Prometheus text exposition of everything recorded so far, if a recorder
/// was installed by [`init_metrics`]
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase
    fn register_metrics();

    /// Phase name used in metric names
    fn phase_name() -> &'static str;

    /// Documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Metric names follow `owner_resolver_{phase}_{name}` with `_total` on counters
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("owner_resolver_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("owner_resolver_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("owner_resolver_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
