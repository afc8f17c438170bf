//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, then every shared component
//! - Bind the listener and begin accepting traffic
//! - Turn termination signals into a graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{resolve_config, Cli, ConfigError};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::Signals;
use crate::observability::init_logging;

/// Fatal startup and shutdown failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run the bridge until a termination signal has been handled.
pub async fn run(cli: Cli) -> Result<(), StartupError> {
    let (config, source) = resolve_config(&cli)?;

    if cli.check_config {
        match &source {
            Some(path) => println!("configuration OK ({})", path.display()),
            None => println!("configuration OK (defaults)"),
        }
        return Ok(());
    }

    init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?source,
        bind_address = %config.listener.bind_address,
        backend_url = %config.backend.url,
        rate_limit = config.rate_limit.requests_per_second,
        rate_limit_burst = config.rate_limit.burst_size,
        timeout_secs = config.listener.timeout_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;
    let mut signals = Signals::install().map_err(StartupError::Signals)?;

    let address = server.config().listener.bind_target();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let mut serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let joined = tokio::select! {
        joined = &mut serving => joined,
        name = signals.recv() => {
            tracing::info!(signal = name, "Shutting down server");
            shutdown.trigger();
            serving.await
        }
    };
    joined.map_err(|e| ServerError::Io(std::io::Error::other(e)))??;

    tracing::info!("Server stopped");
    Ok(())
}
