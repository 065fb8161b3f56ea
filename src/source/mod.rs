//! Events delivered by the upstream pipeline.
//!
//! The exporter only reads events. The command-line binary feeds them from
//! newline-delimited JSON; library users can construct [`Event`]s directly.

mod json_lines;

pub use json_lines::{JsonLinesSource, SourceError};

use serde_json::Value;

/// One inbound event carrying a structured record.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    record: Value,
}

impl Event {
    /// Wraps a record.
    pub fn new(record: Value) -> Self {
        Self { record }
    }

    /// The record fields and values are resolved against.
    pub fn record(&self) -> &Value {
        &self.record
    }
}

impl From<Value> for Event {
    fn from(record: Value) -> Self {
        Self::new(record)
    }
}
