//! # Container Configuration
//!
//! Runtime parameters of one container.
//!
//! ## Validation Rules
//!
//! - `name` must not be empty
//! - `worker_threads`, when set, must be at least 1
//! - `prepare_timeout`, when set, must be non-zero

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use shared_types::Activation;
use thiserror::Error;

/// Container configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Name used in logs and the status report.
    pub name: String,
    /// Run the metadata verifier on every `add_component`.
    pub verify_components: bool,
    /// Upper bound on waiting for queued eager preparations.
    pub prepare_timeout: Option<Duration>,
    /// Size of the preparation pool; `None` prepares on the caller's thread
    /// unless a queue is supplied explicitly.
    pub worker_threads: Option<usize>,
    /// Activation for assembled components without an `activation` attribute.
    pub default_activation: Activation,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "citadel".to_string(),
            verify_components: true,
            prepare_timeout: Some(Duration::from_secs(30)),
            worker_threads: None,
            default_activation: Activation::Eager,
        }
    }
}

impl ContainerConfig {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_components = enabled;
        self
    }

    #[must_use]
    pub fn with_prepare_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.prepare_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: Option<usize>) -> Self {
        self.worker_threads = threads;
        self
    }

    /// One preparation worker per core.
    #[must_use]
    pub fn with_worker_per_core(self) -> Self {
        self.with_worker_threads(Some(num_cpus::get().max(1)))
    }

    #[must_use]
    pub fn with_default_activation(mut self, activation: Activation) -> Self {
        self.default_activation = activation;
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CITADEL_CONTAINER_NAME`: container name (default: citadel)
    /// - `CITADEL_VERIFY_COMPONENTS`: run the metadata verifier (default: true)
    /// - `CITADEL_PREPARE_TIMEOUT_MS`: preparation wait bound, `0` disables it
    ///   (default: 30000)
    /// - `CITADEL_WORKER_THREADS`: preparation pool size, `auto` for one per
    ///   core (default: unset, inline preparation)
    /// - `CITADEL_DEFAULT_ACTIVATION`: `eager` or `lazy` (default: eager)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(name) = lookup("CITADEL_CONTAINER_NAME") {
            config.name = name;
        }
        if let Some(raw) = lookup("CITADEL_VERIFY_COMPONENTS") {
            config.verify_components = match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::invalid_env("CITADEL_VERIFY_COMPONENTS", raw)),
            };
        }
        if let Some(raw) = lookup("CITADEL_PREPARE_TIMEOUT_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env("CITADEL_PREPARE_TIMEOUT_MS", &raw))?;
            config.prepare_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(raw) = lookup("CITADEL_WORKER_THREADS") {
            config.worker_threads = if raw.trim().eq_ignore_ascii_case("auto") {
                Some(num_cpus::get().max(1))
            } else {
                Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| ConfigError::invalid_env("CITADEL_WORKER_THREADS", &raw))?,
                )
            };
        }
        if let Some(raw) = lookup("CITADEL_DEFAULT_ACTIVATION") {
            config.default_activation = raw
                .parse()
                .map_err(|_| ConfigError::invalid_env("CITADEL_DEFAULT_ACTIVATION", &raw))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the container cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.prepare_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("container name must not be empty")]
    EmptyName,

    #[error("worker_threads must be at least 1 (unset it for inline preparation)")]
    ZeroWorkers,

    #[error("prepare_timeout must be non-zero (unset it to wait indefinitely)")]
    ZeroTimeout,

    #[error("environment variable {key} has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("cannot read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    fn invalid_env(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnv {
            key,
            value: value.into(),
        }
    }
}
