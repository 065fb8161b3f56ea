//! Metric definitions and label resolution.
//!
//! A [`MetricDefinition`] is built once per configured metric and never
//! changes afterwards. Its [`LabelResolver`] fixes the label order that the
//! series is registered with.

mod labels;
mod metric;

pub use crate::config::{CountMode, MetricKind};
pub use labels::LabelResolver;
pub use metric::MetricDefinition;
