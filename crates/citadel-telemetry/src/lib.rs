//! # Citadel Telemetry
//!
//! Logging and metrics for Citadel containers.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, plain or JSON lines
//! - **Metrics**: Prometheus counters, gauges and histograms on a private registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use citadel_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Container setup here
//!     println!("{}", citadel_telemetry::gather_metrics()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CITADEL_SERVICE_NAME` | `citadel` | Service name in the startup log |
//! | `CITADEL_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CITADEL_CONSOLE_OUTPUT` | `true` | Write log lines to stdout |
//! | `CITADEL_JSON_LOGS` | `false` | JSON log lines (default on in containers) |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, outcome, register_metrics, HistogramTimer, COMPONENTS_LIVE,
    COMPONENTS_REGISTERED, DISPOSALS, INITIALIZE_DURATION, PREPARATIONS, REGISTRATION_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
