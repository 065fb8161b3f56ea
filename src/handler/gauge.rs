//! Gauge handler: overwrite with the latest observed value.

use super::{as_strs, HandlerError};
use crate::definition::MetricDefinition;
use crate::metrics::{MetricsError, MetricsRegistry};
use crate::path::resolve_optional;
use crate::source::Event;
use prometheus::GaugeVec;

/// Applies events to one gauge series.
pub struct GaugeHandler {
    definition: MetricDefinition,
    series: GaugeVec,
}

impl GaugeHandler {
    /// Registers the gauge series for `definition`.
    pub fn register(
        definition: MetricDefinition,
        registry: &MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        let series = registry.register_gauge_vec(
            definition.name(),
            definition.help(),
            definition.label_keys(),
        )?;
        Ok(Self { definition, series })
    }

    /// Definition the handler was built from.
    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }

    /// Sets the gauge to the value found in the event.
    ///
    /// An event without the value sets the gauge to zero.
    pub fn update(&self, event: &Event) -> Result<(), HandlerError> {
        let record = event.record();
        let value = match self.definition.value_path() {
            Some(path) => resolve_optional::<f64>(record, path)?.unwrap_or_default(),
            None => 0.0,
        };
        let labels = self.definition.labels().values(record)?;

        self.series.with_label_values(&as_strs(&labels)).set(value);
        Ok(())
    }
}
