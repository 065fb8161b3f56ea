//! Configuration file schema.

use super::ConfigError;
use crate::definition::MetricDefinition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Kind of series a metric definition produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Set to the latest value.
    Gauge,
    /// Monotonically increasing total.
    Counter,
}

/// What triggers a counter increment when a value path is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Add the numeric value found at the path.
    #[default]
    Value,
    /// Add one when the path is present.
    Exist,
    /// Add one when the path is absent.
    NonExist,
}

/// Top-level exporter configuration.
///
/// ```toml
/// listen = "0.0.0.0:9090"
///
/// [metrics.http_requests_total]
/// type = "counter"
/// help = "Requests seen by the proxy"
/// labels = { method = "request.method", status = "response.status" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// Address the exposition endpoint binds to, as `host:port`.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// HTTP route serving the exposition text.
    #[serde(default = "default_path")]
    pub path: String,
    /// Metric definitions keyed by series name.
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricConfig>,
}

/// One `[metrics.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    /// Series kind, written as `type`.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Help text shown in the exposition.
    #[serde(default)]
    pub help: String,
    /// Path of the value to observe. Empty means "count events".
    #[serde(default)]
    pub value: String,
    /// Counting mode for counters with a value path.
    #[serde(default)]
    pub count_mode: CountMode,
    /// Label name to path expression.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl MetricConfig {
    /// Creates a gauge definition reading `value`.
    pub fn gauge(value: impl Into<String>) -> Self {
        Self {
            kind: MetricKind::Gauge,
            help: String::new(),
            value: value.into(),
            count_mode: CountMode::default(),
            labels: HashMap::new(),
        }
    }

    /// Creates a counter definition reading `value` (may be empty).
    pub fn counter(value: impl Into<String>, count_mode: CountMode) -> Self {
        Self {
            kind: MetricKind::Counter,
            help: String::new(),
            value: value.into(),
            count_mode,
            labels: HashMap::new(),
        }
    }

    /// Adds a label resolved from `path`.
    pub fn with_label(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.labels.insert(name.into(), path.into());
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            metrics: BTreeMap::new(),
        }
    }
}

impl ExporterConfig {
    /// Validates the configuration, including every metric definition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_listen(&self.listen)?;
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidRoute(self.path.clone()));
        }
        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }
        self.definitions().map(|_| ())
    }

    /// Builds one definition per configured metric, in name order.
    pub fn definitions(&self) -> Result<Vec<MetricDefinition>, ConfigError> {
        self.metrics
            .iter()
            .map(|(name, metric)| MetricDefinition::new(name, metric))
            .collect()
    }
}

fn validate_listen(listen: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidListen(listen.to_string());
    let (host, port) = listen.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;
    // Bracketed IPv6 hosts keep their colons inside the brackets.
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(invalid());
    }
    Ok(())
}

/// Checks a series name against the Prometheus data model.
pub(crate) fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Checks a label name against the Prometheus data model.
pub(crate) fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_listen() -> String {
    "0.0.0.0:9090".into()
}

fn default_path() -> String {
    "/metrics".into()
}
