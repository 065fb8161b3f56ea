//! Per-metric event handlers.
//!
//! A [`MetricHandler`] binds one [`MetricDefinition`] to the series it
//! registered with the sink and applies events to it. The set of handler
//! kinds is closed and selected by the definition's [`MetricKind`].
//!
//! Updates resolve and validate everything first and then perform a single
//! atomic mutation, so a failed update never leaves a partial change.

mod counter;
mod gauge;

pub use counter::CounterHandler;
pub use gauge::GaugeHandler;

use crate::definition::{MetricDefinition, MetricKind};
use crate::metrics::{MetricsError, MetricsRegistry};
use crate::path::ResolveError;
use crate::source::Event;
use thiserror::Error;

/// Errors that fail a single handler update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    /// A value or label had the wrong type.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A counter in `value` mode found a negative number.
    #[error("counter value must be >= 0, got {value} at {path:?}")]
    NegativeCounterValue {
        /// Value path of the counter.
        path: String,
        /// Number found in the event.
        value: f64,
    },
}

/// Handler for one configured metric.
pub enum MetricHandler {
    /// Overwrites a gauge.
    Gauge(GaugeHandler),
    /// Adds to a counter.
    Counter(CounterHandler),
}

impl MetricHandler {
    /// Registers the series for `definition` and builds its handler.
    pub fn register(
        definition: MetricDefinition,
        registry: &MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        Ok(match definition.kind() {
            MetricKind::Gauge => {
                MetricHandler::Gauge(GaugeHandler::register(definition, registry)?)
            }
            MetricKind::Counter => {
                MetricHandler::Counter(CounterHandler::register(definition, registry)?)
            }
        })
    }

    /// Applies one event to the series.
    pub fn update(&self, event: &Event) -> Result<(), HandlerError> {
        match self {
            MetricHandler::Gauge(h) => h.update(event),
            MetricHandler::Counter(h) => h.update(event),
        }
    }

    /// Definition the handler was built from.
    pub fn definition(&self) -> &MetricDefinition {
        match self {
            MetricHandler::Gauge(h) => h.definition(),
            MetricHandler::Counter(h) => h.definition(),
        }
    }

    /// Series name.
    pub fn name(&self) -> &str {
        self.definition().name()
    }
}

/// Borrows resolved label values the way the Prometheus client expects.
fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountMode, MetricConfig};
    use serde_json::json;

    #[test]
    fn test_kind_selects_handler() {
        let registry = MetricsRegistry::new();
        let gauge = MetricDefinition::new("load", &MetricConfig::gauge("load")).unwrap();
        let counter =
            MetricDefinition::new("hits_total", &MetricConfig::counter("", CountMode::Value))
                .unwrap();

        assert!(matches!(
            MetricHandler::register(gauge, &registry).unwrap(),
            MetricHandler::Gauge(_)
        ));
        let counter = MetricHandler::register(counter, &registry).unwrap();
        assert!(matches!(counter, MetricHandler::Counter(_)));
        assert_eq!(counter.name(), "hits_total");

        counter.update(&Event::new(json!({}))).unwrap();
        assert_eq!(registry.sample("hits_total", &[]), Some(1.0));
    }

    #[test]
    fn test_duplicate_series_is_fatal() {
        let registry = MetricsRegistry::new();
        let def = MetricDefinition::new("load", &MetricConfig::gauge("load")).unwrap();
        MetricHandler::register(def.clone(), &registry).unwrap();
        assert!(MetricHandler::register(def, &registry).is_err());
    }
}
