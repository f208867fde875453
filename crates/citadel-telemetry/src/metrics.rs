//! Prometheus metrics for Citadel containers.
//!
//! All metrics follow the naming convention: `citadel_<subject>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: registrations, preparations and disposals by outcome
//! - **Gauge**: components currently prepared
//! - **Histogram**: duration of a full `initialize()` pass

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Components accepted by `add_component`
    pub static ref COMPONENTS_REGISTERED: Counter = Counter::new(
        "citadel_components_registered_total",
        "Total number of components registered"
    ).expect("metric creation failed");

    /// Components rejected by `add_component`
    pub static ref REGISTRATION_FAILURES: Counter = Counter::new(
        "citadel_component_registration_failures_total",
        "Total number of rejected component registrations"
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Eager preparations by outcome
    pub static ref PREPARATIONS: CounterVec = CounterVec::new(
        Opts::new("citadel_component_preparations_total", "Eager component preparations"),
        &["outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    /// Handler disposals by outcome
    pub static ref DISPOSALS: CounterVec = CounterVec::new(
        Opts::new("citadel_component_disposals_total", "Component disposals"),
        &["outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    /// Components currently prepared
    pub static ref COMPONENTS_LIVE: Gauge = Gauge::new(
        "citadel_components_live",
        "Number of components with a live instance"
    ).expect("metric creation failed");

    /// Duration of `initialize()`
    pub static ref INITIALIZE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "citadel_container_initialize_duration_seconds",
            "Time spent preparing eager components"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("valid bucket layout"))
    ).expect("metric creation failed");
}

/// Outcome label for counters split by success.
pub fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(COMPONENTS_REGISTERED.clone()),
        Box::new(REGISTRATION_FAILURES.clone()),
        Box::new(PREPARATIONS.clone()),
        Box::new(DISPOSALS.clone()),
        Box::new(COMPONENTS_LIVE.clone()),
        Box::new(INITIALIZE_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
