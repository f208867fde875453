//! # Citadel
//!
//! Demo executable for the Citadel component container.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging + Prometheus registry)
//! 2. Load `ContainerConfig` from the environment
//! 3. Build the container over the demo catalog and roles
//! 4. Assemble components from a JSON configuration tree
//!    (first CLI argument, or the embedded demo configuration)
//! 5. Initialize, greet through the container, print status
//! 6. Dispose and dump metrics

use std::sync::Arc;

use anyhow::{Context, Result};
use citadel_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};
use container_runtime::{assemble, demo, load_configuration, Container, ContainerConfig};
use ct_03_lifecycle::{TokioCommandQueue, TypeCatalog};
use shared_types::Role;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let config = ContainerConfig::from_env().context("invalid container configuration")?;
    info!(
        service = %telemetry.service_name,
        container = %config.name,
        "Starting Citadel container"
    );

    let catalog = Arc::new(TypeCatalog::new());
    demo::register_types(&catalog).context("failed to register demo types")?;
    let roles = demo::role_manager().context("failed to load demo roles")?;

    let mut builder = Container::builder(config.clone())
        .catalog(catalog)
        .roles(Arc::new(roles));
    if config.worker_threads.is_none() {
        builder = builder.queue(Arc::new(TokioCommandQueue::current()?));
    }
    let container = builder.build()?;

    let configuration = match std::env::args().nth(1) {
        Some(path) => load_configuration(&path)
            .with_context(|| format!("failed to load container configuration from {path}"))?,
        None => demo::container_configuration()?,
    };
    let report = assemble(&container, &configuration);
    for failure in &report.failures {
        warn!(
            element = %failure.element,
            hint = %failure.hint,
            "Component skipped: {}",
            failure.error
        );
    }

    // Preparation blocks on the queue's completion latch.
    tokio::task::block_in_place(|| container.initialize())?;

    match container.component::<demo::Greeter>(&Role::new(demo::GREETER_ROLE), None) {
        Ok(greeter) => {
            let message = greeter.greet("world")?;
            info!(%message, "Greeter answered");
        }
        Err(error) => warn!(%error, "No greeter available"),
    }

    container.print_status();

    let summary = container.dispose();
    info!(
        disposed = summary.disposed,
        failed = summary.failed,
        "Citadel container stopped"
    );

    println!("{}", gather_metrics()?);
    Ok(())
}
