//! Fan-out of events to metric handlers.

mod dispatcher;

pub use dispatcher::{DispatchSummary, Dispatcher};
