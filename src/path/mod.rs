//! Path expressions into event records.
//!
//! A path such as `request.headers[0].name` addresses a location inside the
//! nested record carried by an event. Paths are parsed once, when the
//! configuration is loaded, and resolved against every event afterwards.
//!
//! Resolution distinguishes three outcomes:
//!
//! - the value is present and converts to the requested type,
//! - the path does not exist in this event ([`ResolveError::NotFound`]),
//!   which callers treat as a soft condition,
//! - the value exists but has the wrong shape
//!   ([`ResolveError::TypeMismatch`]), which is a hard error.

mod expr;
mod resolve;

pub use expr::{Path, PathError, Segment};
pub use resolve::{resolve, resolve_optional, resolve_value, FromValue, ResolveError};
