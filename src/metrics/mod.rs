//! Prometheus sink and exposition endpoint.
//!
//! [`MetricsRegistry`] is the sink the metric handlers register their
//! series with. [`MetricsServer`] serves the registry in the Prometheus text
//! format over HTTP.
//!
//! Series values are updated with single atomic operations by the
//! handlers while the server gathers them concurrently, so neither side
//! takes a lock around multi-step logic.
//!
//! # Example
//!
//! ```no_run
//! use out_prometheus::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = MetricsRegistry::new();
//! let requests = registry.register_counter_vec("requests_total", "Requests", &["code".into()])?;
//! requests.with_label_values(&["200"]).inc();
//!
//! let server = MetricsServer::new(MetricsServerConfig::with_listen("127.0.0.1:9090"), registry);
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

mod collector;
mod server;

pub use collector::{MetricsError, MetricsRegistry};
pub use server::{BoundMetricsServer, MetricsServer, MetricsServerConfig, ServerError};
