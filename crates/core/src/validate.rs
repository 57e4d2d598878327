//! The validation pass: cast every filter in a set against one input map.
//!
//! For each declared filter:
//! - If the key is present and non-nil: cast it
//! - If absent or nil with a default: use the cast default
//! - If absent or nil without a default: record a `missing` entry
//!
//! Failures never short-circuit; every filter is tried and every failure
//! is folded into the report. Keys the set does not declare are ignored.

use indexmap::IndexMap;

use crate::cast::cast;
use crate::error::UsageError;
use crate::filter_set::FilterSet;
use crate::report::ErrorReport;
use crate::value::Value;

/// The outcome of a validation pass: the attributes that cast cleanly,
/// in declaration order, and the report for those that did not.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub attributes: IndexMap<String, Value>,
    pub report: ErrorReport,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The cast attributes as a JSON object.
    pub fn attributes_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

/// Cast `inputs` against every filter in `set`.
pub fn process(set: &FilterSet, inputs: &Value) -> Result<Validated, UsageError> {
    let map = inputs
        .as_hash()
        .ok_or_else(|| UsageError::NotAMapping(inputs.type_name()))?;

    let mut validated = Validated::default();
    for filter in set {
        match cast(filter, map.get(filter.name())) {
            Ok(value) => {
                validated.attributes.insert(filter.name().to_string(), value);
            }
            Err(error) => {
                validated
                    .report
                    .record(filter.name(), filter.tag().human_name(), error);
            }
        }
    }

    tracing::debug!(
        filters = set.len(),
        cast = validated.attributes.len(),
        errors = validated.report.len(),
        "validation pass complete"
    );
    Ok(validated)
}

/// Run the validation pass and keep only the report.
pub fn validate(set: &FilterSet, inputs: &Value) -> Result<ErrorReport, UsageError> {
    process(set, inputs).map(|validated| validated.report)
}

/// [`process`] over a JSON input document.
pub fn process_json(set: &FilterSet, inputs: &serde_json::Value) -> Result<Validated, UsageError> {
    process(set, &Value::from_json(inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::report::ErrorKind;
    use serde_json::json;

    fn point() -> FilterSet {
        let mut set = FilterSet::new();
        set.integer("x", Options::new()).unwrap();
        set.integer("y", Options::new().default_value(0)).unwrap();
        set
    }

    #[test]
    fn non_mapping_inputs_are_a_usage_error() {
        assert_eq!(
            validate(&point(), &Value::Array(vec![])),
            Err(UsageError::NotAMapping("array"))
        );
    }

    #[test]
    fn defaults_fill_absent_keys() {
        let validated = process_json(&point(), &json!({ "x": "3" })).unwrap();
        assert!(validated.is_valid());
        assert_eq!(validated.get("x"), Some(&Value::Integer(3)));
        assert_eq!(validated.get("y"), Some(&Value::Integer(0)));
    }

    #[test]
    fn every_failure_is_reported() {
        let validated = process_json(&point(), &json!({ "y": "north" })).unwrap();
        let kinds: Vec<(String, ErrorKind)> = validated
            .report
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("x".to_string(), ErrorKind::Missing),
                ("y".to_string(), ErrorKind::Invalid),
            ]
        );
        assert!(validated.attributes.is_empty());
    }

    #[test]
    fn undeclared_keys_are_ignored() {
        let report = validate(&point(), &Value::from(json!({ "x": 1, "z": true }))).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn attributes_render_as_json() {
        let validated = process_json(&point(), &json!({ "x": 1.0 })).unwrap();
        assert_eq!(validated.attributes_json(), json!({ "x": 1, "y": 0 }));
    }
}
