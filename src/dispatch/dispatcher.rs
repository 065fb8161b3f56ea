//! Event fan-out with per-handler failure isolation.

use crate::definition::MetricDefinition;
use crate::handler::MetricHandler;
use crate::metrics::{MetricsError, MetricsRegistry};
use crate::source::Event;

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Handlers that applied the event.
    pub updated: usize,
    /// Handlers whose update failed and was logged.
    pub failed: usize,
}

/// Holds every metric handler and applies each event to all of them.
///
/// Handlers own disjoint series, so one handler failing on an event has no
/// effect on the others. Failures are logged here and never returned.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<MetricHandler>,
}

impl Dispatcher {
    /// Creates a dispatcher without handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one handler per definition. Any registration failure is
    /// returned and nothing is kept.
    pub fn register(
        definitions: impl IntoIterator<Item = MetricDefinition>,
        registry: &MetricsRegistry,
    ) -> Result<Self, MetricsError> {
        let handlers = definitions
            .into_iter()
            .map(|definition| MetricHandler::register(definition, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { handlers })
    }

    /// Series names, in registration order.
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(MetricHandler::name).collect()
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Applies `event` to every handler.
    pub fn dispatch(&self, event: &Event) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for handler in &self.handlers {
            match handler.update(event) {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        metric = %handler.name(),
                        error = %e,
                        "failed to update metric"
                    );
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountMode, MetricConfig};
    use serde_json::json;

    fn definition(name: &str, config: MetricConfig) -> MetricDefinition {
        MetricDefinition::new(name, &config).unwrap()
    }

    #[test]
    fn test_failure_is_isolated() {
        let registry = MetricsRegistry::new();
        let dispatcher = Dispatcher::register(
            [
                definition("a_total", MetricConfig::counter("", CountMode::Value)),
                definition("b_total", MetricConfig::counter("n", CountMode::Value)),
                definition("c", MetricConfig::gauge("v")),
            ],
            &registry,
        )
        .unwrap();
        assert_eq!(dispatcher.handler_names(), ["a_total", "b_total", "c"]);

        let summary = dispatcher.dispatch(&Event::new(json!({"n": -1, "v": 4.0})));

        assert_eq!(summary, DispatchSummary { updated: 2, failed: 1 });
        assert_eq!(registry.sample("a_total", &[]), Some(1.0));
        assert_eq!(registry.sample("b_total", &[]), None);
        assert_eq!(registry.sample("c", &[]), Some(4.0));
    }

    #[test]
    fn test_every_handler_sees_every_event() {
        let registry = MetricsRegistry::new();
        let dispatcher = Dispatcher::register(
            [
                definition("seen_total", MetricConfig::counter("", CountMode::Value)),
                definition("with_user_total", MetricConfig::counter("user", CountMode::Exist)),
                definition(
                    "without_user_total",
                    MetricConfig::counter("user", CountMode::NonExist),
                ),
            ],
            &registry,
        )
        .unwrap();

        for record in [json!({"user": "a"}), json!({}), json!({"user": "b"}), json!({})] {
            let summary = dispatcher.dispatch(&Event::new(record));
            assert_eq!(summary.failed, 0);
        }

        assert_eq!(registry.sample("seen_total", &[]), Some(4.0));
        assert_eq!(registry.sample("with_user_total", &[]), Some(2.0));
        assert_eq!(registry.sample("without_user_total", &[]), Some(2.0));
    }

    #[test]
    fn test_duplicate_registration_aborts() {
        let registry = MetricsRegistry::new();
        let result = Dispatcher::register(
            [
                definition("x", MetricConfig::gauge("v")),
                definition("x", MetricConfig::gauge("w")),
            ],
            &registry,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_dispatcher() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(
            dispatcher.dispatch(&Event::new(json!({}))),
            DispatchSummary::default()
        );
    }
}
