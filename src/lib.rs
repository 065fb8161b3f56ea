//! Prometheus exporter for structured events.
//!
//! Events arriving from an upstream pipeline carry a nested record. Each
//! configured metric names a path into that record for its value and a path
//! per label; every event updates the matching gauge or counter series, and
//! the series are served over HTTP in the Prometheus text format.
//!
//! # Architecture
//!
//! ```text
//! config → definition → handler ─┐
//!                                ├→ dispatch ← source (events)
//!          metrics (registry) ←──┘
//!              ↓
//!          metrics server (GET /metrics)
//! ```
//!
//! # Design Principles
//!
//! - **Fail early**: unknown metric types, count modes, malformed paths and
//!   registration conflicts stop the exporter before it serves anything
//! - **Absent is not an error**: a missing path yields no value (or an empty
//!   label), only values of the wrong shape fail an update
//! - **Isolated failures**: one metric failing on an event never stops the
//!   other metrics from seeing it
//! - **Explicit registry**: series live in a registry owned by the exporter,
//!   never in a process-wide default
//!
//! # Example
//!
//! ```no_run
//! use out_prometheus::{Event, Exporter, ExporterConfig};
//! use serde_json::json;
//!
//! let config = ExporterConfig::from_toml_str(r#"
//! listen = "127.0.0.1:9090"
//!
//! [metrics.http_requests_total]
//! type = "counter"
//! help = "Requests seen"
//! labels = { status = "response.status" }
//!
//! [metrics.upstream_latency_seconds]
//! type = "gauge"
//! help = "Latency of the last request"
//! value = "timing.upstream"
//! "#).unwrap();
//!
//! let mut exporter = Exporter::init(config).unwrap();
//! exporter.start().unwrap();
//!
//! exporter.handle(&Event::new(json!({
//!     "response": {"status": 200},
//!     "timing": {"upstream": 0.042},
//! })));
//!
//! exporter.close();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod definition;
pub mod dispatch;
pub mod exporter;
pub mod handler;
pub mod metrics;
pub mod path;
pub mod source;

// Re-export commonly used types at crate root
pub use config::{ConfigError, CountMode, ExporterConfig, MetricConfig, MetricKind};
pub use definition::{LabelResolver, MetricDefinition};
pub use dispatch::{DispatchSummary, Dispatcher};
pub use exporter::{Exporter, ExporterError};
pub use handler::{HandlerError, MetricHandler};
pub use metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig};
pub use path::{Path, PathError, ResolveError};
pub use source::{Event, JsonLinesSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
