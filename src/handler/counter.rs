//! Counter handler.

use super::{as_strs, HandlerError};
use crate::definition::{CountMode, MetricDefinition};
use crate::metrics::{MetricsError, MetricsRegistry};
use crate::path::{resolve_optional, resolve_value};
use crate::source::Event;
use prometheus::CounterVec;

/// Applies events to one counter series.
pub struct CounterHandler {
    definition: MetricDefinition,
    series: CounterVec,
}

impl CounterHandler {
    /// Registers the counter series for `definition`.
    pub fn register(
        definition: MetricDefinition,
        registry: &MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        let series = registry.register_counter_vec(
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

    /// Applies one event.
    ///
    /// Without a value path every event counts once. Otherwise the count
    /// mode decides: `value` adds the number found (which must not be
    /// negative), `exist` counts events where the path is present, and
    /// `non_exist` counts events where it is absent. Presence ignores the
    /// value itself, so `false` and `0` are present.
    pub fn update(&self, event: &Event) -> Result<(), HandlerError> {
        let record = event.record();
        let labels = self.definition.labels().values(record)?;

        let amount = match self.definition.value_path() {
            None => 1.0,
            Some(path) => match self.definition.count_mode() {
                CountMode::Value => match resolve_optional::<f64>(record, path)? {
                    Some(v) if v < 0.0 => {
                        return Err(HandlerError::NegativeCounterValue {
                            path: path.to_string(),
                            value: v,
                        })
                    }
                    Some(v) => v,
                    None => 0.0,
                },
                CountMode::Exist if resolve_value(record, path).is_ok() => 1.0,
                CountMode::NonExist if resolve_value(record, path).is_err() => 1.0,
                CountMode::Exist | CountMode::NonExist => 0.0,
            },
        };

        // The label combination is exported from its first event on, even at zero.
        let series = self.series.with_label_values(&as_strs(&labels));
        if amount > 0.0 {
            series.inc_by(amount);
        }
        Ok(())
    }
}
