//! Exporter lifecycle: init, start, handle events, close.

use crate::config::{ConfigError, ExporterConfig};
use crate::definition::MetricDefinition;
use crate::dispatch::{DispatchSummary, Dispatcher};
use crate::metrics::{
    MetricsError, MetricsRegistry, MetricsServer, MetricsServerConfig, ServerError,
};
use crate::source::Event;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

/// Errors that prevent the exporter from starting.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A series could not be registered.
    #[error("failed to register metric: {0}")]
    Metrics(#[from] MetricsError),

    /// The exposition endpoint could not be started.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// The async runtime could not be built.
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),

    /// `start` was called twice.
    #[error("exporter already started")]
    AlreadyStarted,
}

const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

struct Running {
    runtime: Runtime,
    serve: JoinHandle<()>,
    local_addr: SocketAddr,
}

/// Turns events into metric updates and serves them over HTTP.
pub struct Exporter {
    config: ExporterConfig,
    definitions: Vec<MetricDefinition>,
    registry: MetricsRegistry,
    dispatcher: Dispatcher,
    running: Option<Running>,
}

impl Exporter {
    /// Validates `config` and prepares one definition per metric.
    pub fn init(config: ExporterConfig) -> Result<Self, ExporterError> {
        config.validate()?;
        let definitions = config.definitions()?;
        Ok(Self {
            config,
            definitions,
            registry: MetricsRegistry::new(),
            dispatcher: Dispatcher::new(),
            running: None,
        })
    }

    /// Registers every handler, binds the listener and starts serving in
    /// the background. Returns the bound address.
    pub fn start(&mut self) -> Result<SocketAddr, ExporterError> {
        if self.running.is_some() {
            return Err(ExporterError::AlreadyStarted);
        }

        // Series go into a fresh registry that is kept only once serving starts,
        // so a failed start can be retried.
        let registry = MetricsRegistry::new();
        let dispatcher = Dispatcher::register(self.definitions.iter().cloned(), &registry)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("out-prometheus-http")
            .enable_all()
            .build()
            .map_err(ExporterError::Runtime)?;

        let server = MetricsServer::new(
            MetricsServerConfig {
                listen: self.config.listen.clone(),
                path: self.config.path.clone(),
            },
            registry.clone(),
        );
        let bound = runtime.block_on(server.bind())?;
        let local_addr = bound.local_addr();

        let serve = runtime.spawn(async move {
            if let Err(e) = bound.serve().await {
                tracing::error!(error = %e, "metrics server stopped");
            }
        });

        tracing::info!(addr = %local_addr, metrics = dispatcher.len(), "exporter started");
        self.registry = registry;
        self.dispatcher = dispatcher;
        self.running = Some(Running {
            runtime,
            serve,
            local_addr,
        });
        Ok(local_addr)
    }

    /// Applies one event to every metric. Failures are logged, never returned.
    pub fn handle(&self, event: &Event) -> DispatchSummary {
        self.dispatcher.dispatch(event)
    }

    /// Closes the listener. In-flight requests are not drained.
    ///
    /// Must not be called from inside an async context.
    pub fn close(&mut self) {
        if let Some(running) = self.running.take() {
            running.serve.abort();
            running.runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
            tracing::info!(addr = %running.local_addr, "exporter closed");
        }
    }

    /// Address of the exposition endpoint while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    /// Returns true between a successful `start` and `close`.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Registry holding the served series. Empty until started.
    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// The validated configuration.
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }
}

impl Drop for Exporter {
    fn drop(&mut self) {
        self.close();
    }
}
