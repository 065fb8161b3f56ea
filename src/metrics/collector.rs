//! Metrics collection and registry.

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The client rejected the series, e.g. a duplicate name.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Registry holding every series the exporter serves.
///
/// Each exporter owns its own registry instead of the process-wide default,
/// so independent exporters (and tests) never see each other's series.
/// Cloning is cheap and clones share the same series.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a labelled gauge series.
    pub fn register_gauge_vec(
        &self,
        name: &str,
        help: &str,
        label_names: &[String],
    ) -> Result<GaugeVec, MetricsError> {
        let labels: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let vec = GaugeVec::new(Opts::new(name, help), &labels)?;
        self.registry.register(Box::new(vec.clone()))?;
        Ok(vec)
    }

    /// Creates and registers a labelled counter series.
    pub fn register_counter_vec(
        &self,
        name: &str,
        help: &str,
        label_names: &[String],
    ) -> Result<CounterVec, MetricsError> {
        let labels: Vec<&str> = label_names.iter().map(String::as_str).collect();
        let vec = CounterVec::new(Opts::new(name, help), &labels)?;
        self.registry.register(Box::new(vec.clone()))?;
        Ok(vec)
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Current value of one label combination, if it has been observed.
    ///
    /// `labels` is matched against every label pair of the sample.
    pub fn sample(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        let family = self
            .registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == name)?;

        family.get_metric().iter().find_map(|metric| {
            let pairs = metric.get_label();
            let matches = pairs.len() == labels.len()
                && labels.iter().all(|(k, v)| {
                    pairs
                        .iter()
                        .any(|pair| pair.get_name() == *k && pair.get_value() == *v)
                });
            if !matches {
                return None;
            }
            if metric.has_counter() {
                Some(metric.get_counter().get_value())
            } else {
                Some(metric.get_gauge().get_value())
            }
        })
    }
}
