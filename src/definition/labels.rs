//! Label value resolution.

use crate::path::{resolve_optional, Path, ResolveError};
use serde_json::Value;

/// Resolves label values for a metric in a fixed order.
///
/// Label names are sorted once, here, and never reordered. The same order
/// is registered with the sink as the series schema and used for every
/// per-event value list.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    keys: Vec<String>,
    paths: Vec<Path>,
}

impl LabelResolver {
    /// Builds a resolver from `(name, path)` pairs in any order.
    pub fn new(labels: impl IntoIterator<Item = (String, Path)>) -> Self {
        let mut labels: Vec<(String, Path)> = labels.into_iter().collect();
        labels.sort_by(|a, b| a.0.cmp(&b.0));
        let (keys, paths): (Vec<String>, Vec<Path>) = labels.into_iter().unzip();
        Self { keys, paths }
    }

    /// Label names, sorted.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when the metric has no labels.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Resolves one value per label, in [`keys`](Self::keys) order.
    ///
    /// Absent paths become empty strings. A type mismatch on any label fails
    /// the whole list.
    pub fn values(&self, record: &Value) -> Result<Vec<String>, ResolveError> {
        self.paths
            .iter()
            .map(|path| resolve_optional::<String>(record, path).map(Option::unwrap_or_default))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn resolver(pairs: &[(&str, &str)]) -> LabelResolver {
        LabelResolver::new(
            pairs
                .iter()
                .map(|(k, p)| (k.to_string(), Path::parse(p).unwrap())),
        )
    }

    #[test]
    fn test_values_follow_sorted_keys() {
        let labels = resolver(&[("status", "res.code"), ("method", "req.method")]);
        assert_eq!(labels.keys(), ["method", "status"]);

        let record = json!({"req": {"method": "GET"}, "res": {"code": 404}});
        assert_eq!(labels.values(&record).unwrap(), ["GET", "404"]);
    }

    #[test]
    fn test_missing_label_is_empty_string() {
        let labels = resolver(&[("host", "host"), ("zone", "meta.zone")]);
        let record = json!({"host": "web-1"});
        assert_eq!(labels.values(&record).unwrap(), ["web-1", ""]);
    }

    #[test]
    fn test_type_mismatch_aborts_all_labels() {
        let labels = resolver(&[("a", "missing"), ("b", "nested")]);
        let record = json!({"nested": {"x": 1}});
        let err = labels.values(&record).unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn test_no_labels() {
        let labels = resolver(&[]);
        assert!(labels.is_empty());
        assert!(labels.values(&json!({})).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn keys_are_sorted_and_resolution_is_deterministic(
            names in proptest::collection::hash_set("[a-z][a-z0-9_]{0,8}", 0..8)
        ) {
            let labels = LabelResolver::new(
                names.iter().map(|n| (n.clone(), Path::parse(n).unwrap())),
            );

            let mut expected: Vec<String> = names.iter().cloned().collect();
            expected.sort();
            prop_assert_eq!(labels.keys(), expected.as_slice());

            let record = Value::Object(
                names.iter().map(|n| (n.clone(), Value::String(n.to_uppercase()))).collect(),
            );
            let first = labels.values(&record).unwrap();
            let second = labels.values(&record).unwrap();
            prop_assert_eq!(&first, &second);
            let upper: Vec<String> = expected.iter().map(|n| n.to_uppercase()).collect();
            prop_assert_eq!(first, upper);
        }
    }
}
