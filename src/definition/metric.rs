//! Validated metric definitions.

use super::LabelResolver;
use crate::config::{
    is_valid_label_name, is_valid_metric_name, ConfigError, CountMode, MetricConfig, MetricKind,
};
use crate::path::Path;

/// Immutable description of one configured metric.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    name: String,
    kind: MetricKind,
    help: String,
    value: Option<Path>,
    count_mode: CountMode,
    labels: LabelResolver,
}

impl MetricDefinition {
    /// Validates `config` and builds the definition for series `name`.
    pub fn new(name: &str, config: &MetricConfig) -> Result<Self, ConfigError> {
        if !is_valid_metric_name(name) {
            return Err(ConfigError::InvalidMetricName(name.to_string()));
        }

        let parse = |expr: &str| {
            Path::parse(expr).map_err(|source| ConfigError::InvalidPath {
                metric: name.to_string(),
                source,
            })
        };

        let value = match config.value.as_str() {
            "" => None,
            expr => Some(parse(expr)?),
        };
        if config.kind == MetricKind::Gauge && value.is_none() {
            return Err(ConfigError::MissingValuePath(name.to_string()));
        }

        let mut labels = Vec::with_capacity(config.labels.len());
        for (label, expr) in &config.labels {
            if !is_valid_label_name(label) {
                return Err(ConfigError::InvalidLabelName {
                    metric: name.to_string(),
                    label: label.clone(),
                });
            }
            labels.push((label.clone(), parse(expr)?));
        }

        // The Prometheus client refuses empty help text.
        let help = if config.help.trim().is_empty() {
            name.to_string()
        } else {
            config.help.clone()
        };

        Ok(Self {
            name: name.to_string(),
            kind: config.kind,
            help,
            value,
            count_mode: config.count_mode,
            labels: LabelResolver::new(labels),
        })
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gauge or counter.
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Help text, never empty.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Value path, or `None` for counters that count events.
    pub fn value_path(&self) -> Option<&Path> {
        self.value.as_ref()
    }

    /// Counting mode. Unused by gauges.
    pub fn count_mode(&self) -> CountMode {
        self.count_mode
    }

    /// Resolver for the label values.
    pub fn labels(&self) -> &LabelResolver {
        &self.labels
    }

    /// Sorted label names forming the series schema.
    pub fn label_keys(&self) -> &[String] {
        self.labels.keys()
    }
}
