//! Path resolution against event records.

use super::{Path, Segment};
use serde_json::Value;
use thiserror::Error;

/// Outcome of a failed resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path does not exist in this record.
    #[error("path {path:?} not found")]
    NotFound {
        /// Path as written in the configuration.
        path: String,
    },

    /// The path exists but holds a value of the wrong shape.
    #[error("path {path:?} holds {found}, expected {expected}")]
    TypeMismatch {
        /// Path as written in the configuration.
        path: String,
        /// Type the caller asked for.
        expected: &'static str,
        /// Kind of value actually found.
        found: &'static str,
    },
}

impl ResolveError {
    /// Returns true for the soft "path absent" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }
}

/// Conversion from a resolved record value into a typed target.
pub trait FromValue: Sized {
    /// Name of the target type, used in mismatch errors.
    const EXPECTED: &'static str;

    /// Converts the value, or returns `None` when it has the wrong shape.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Looks up the value at `path` without any type expectation.
///
/// Any present value counts, including `null`, `false` and `0`.
pub fn resolve_value<'a>(record: &'a Value, path: &Path) -> Result<&'a Value, ResolveError> {
    let mut node = record;
    for segment in path.segments() {
        let next = match (segment, node) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Key(key), Value::Array(items)) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            _ => None,
        };
        node = next.ok_or_else(|| ResolveError::NotFound {
            path: path.to_string(),
        })?;
    }
    Ok(node)
}

/// Resolves `path` and converts the value to `T`.
///
/// A `null` leaf is reported as not found.
pub fn resolve<T: FromValue>(record: &Value, path: &Path) -> Result<T, ResolveError> {
    let value = resolve_value(record, path)?;
    if value.is_null() {
        return Err(ResolveError::NotFound {
            path: path.to_string(),
        });
    }
    T::from_value(value).ok_or_else(|| ResolveError::TypeMismatch {
        path: path.to_string(),
        expected: T::EXPECTED,
        found: kind_of(value),
    })
}

/// Like [`resolve`], but an absent path yields `Ok(None)`.
pub fn resolve_optional<T: FromValue>(
    record: &Value,
    path: &Path,
) -> Result<Option<T>, ResolveError> {
    match resolve(record, path) {
        Ok(v) => Ok(Some(v)),
        Err(ResolveError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
