//! Exporter configuration.
//!
//! The configuration is a TOML file with a listen address and one table per
//! metric. Unknown metric types and count modes are rejected while parsing,
//! everything else by [`ExporterConfig::validate`], so a configuration that
//! loads successfully can always be started.

mod schema;

use crate::path::PathError;
use std::path::Path;

pub use schema::{CountMode, ExporterConfig, MetricConfig, MetricKind};
pub(crate) use schema::{is_valid_label_name, is_valid_metric_name};

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The TOML is invalid, or names an unknown type, count mode or field.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    /// `listen` is not `host:port`.
    #[error("invalid listen address {0:?} (expected host:port)")]
    InvalidListen(String),
    /// `path` does not start with `/`.
    #[error("invalid exposition route {0:?} (must start with '/')")]
    InvalidRoute(String),
    /// The `metrics` table is empty.
    #[error("no metrics configured")]
    NoMetrics,
    /// A metric name is not a valid Prometheus series name.
    #[error("invalid metric name {0:?}")]
    InvalidMetricName(String),
    /// A label name is not a valid Prometheus label name.
    #[error("metric {metric}: invalid label name {label:?}")]
    InvalidLabelName {
        /// Metric declaring the label.
        metric: String,
        /// Offending label name.
        label: String,
    },
    /// A gauge has no `value` path.
    #[error("metric {0}: gauges require a value path")]
    MissingValuePath(String),
    /// A value or label path does not parse.
    #[error("metric {metric}: {source}")]
    InvalidPath {
        /// Metric declaring the path.
        metric: String,
        /// Parse failure.
        #[source]
        source: PathError,
    },
}

impl ExporterConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_config() {
        let config = ExporterConfig::from_toml_str(
            r#"
listen = "127.0.0.1:9100"

[metrics.cpu_load]
type = "gauge"
help = "Current CPU load"
value = "cpu.load"
labels = { host = "host.name" }

[metrics.requests_total]
type = "counter"

[metrics.errors_total]
type = "counter"
value = "error"
count_mode = "exist"
"#,
        )
        .unwrap();

        assert_eq!(config.listen, "127.0.0.1:9100");
        assert_eq!(config.path, "/metrics");
        assert_eq!(config.metrics.len(), 3);

        let cpu = &config.metrics["cpu_load"];
        assert_eq!(cpu.kind, MetricKind::Gauge);
        assert_eq!(cpu.labels["host"], "host.name");
        assert_eq!(cpu.count_mode, CountMode::Value);

        assert_eq!(config.metrics["errors_total"].count_mode, CountMode::Exist);
        assert!(config.metrics["requests_total"].value.is_empty());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = ExporterConfig::from_toml_str(
            r#"
[metrics.latency]
type = "histogram"
value = "rt"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_count_mode_rejected() {
        let err = ExporterConfig::from_toml_str(
            r#"
[metrics.hits]
type = "counter"
value = "hit"
count_mode = "truthy"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ExporterConfig::from_toml_str(
            r#"
[metrics.hits]
type = "counter"
lables = { a = "b" }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_gauge_without_value_rejected() {
        let err = ExporterConfig::from_toml_str(
            r#"
[metrics.temperature]
type = "gauge"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValuePath(name) if name == "temperature"));
    }

    #[test]
    fn test_malformed_label_path_rejected() {
        let err = ExporterConfig::from_toml_str(
            r#"
[metrics.hits]
type = "counter"
labels = { code = "status[" }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
    }

    #[test]
    fn test_example_config_loads() {
        let config = ExporterConfig::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/out-prometheus.example.toml"
        ))
        .unwrap();
        assert_eq!(config.metrics.len(), 5);
        assert_eq!(
            config.metrics["http_anonymous_requests_total"].count_mode,
            CountMode::NonExist
        );
    }

    #[test]
    fn test_missing_file() {
        let err = ExporterConfig::from_file("/nonexistent/out-prometheus.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError(_)));
    }
}
