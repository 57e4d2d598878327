//! Array and hash rules. Both recurse through [`cast`] for nested values
//! and collect every nested failure instead of stopping at the first.

use indexmap::IndexMap;

use super::{cast, CastError};
use crate::filter::Filter;
use crate::registry::TypeTag;
use crate::report::PathSegment;
use crate::value::Value;

/// Without an element filter the array passes through unchecked.
pub(super) fn array(filter: &Filter, value: &Value) -> Result<Value, CastError> {
    let Value::Array(items) = value else {
        return Err(CastError::invalid(TypeTag::Array));
    };
    let Some(element) = filter.element() else {
        return Ok(Value::Array(items.clone()));
    };

    let mut cast_items = Vec::with_capacity(items.len());
    let mut nested = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match cast(element, Some(item)) {
            Ok(v) => cast_items.push(v),
            Err(e) => nested.extend(e.into_nested(PathSegment::Index(index), element)),
        }
    }

    if nested.is_empty() {
        Ok(Value::Array(cast_items))
    } else {
        Err(CastError::Invalid {
            type_name: TypeTag::Array.human_name(),
            nested,
        })
    }
}

/// Declared keys are cast in declaration order. Undeclared keys are
/// dropped unless the filter has `strip: false`, in which case they are
/// kept as given.
pub(super) fn hash(filter: &Filter, value: &Value) -> Result<Value, CastError> {
    let Value::Hash(entries) = value else {
        return Err(CastError::invalid(TypeTag::Hash));
    };
    let children = filter.children();

    let mut cast_entries = IndexMap::with_capacity(children.len());
    let mut nested = Vec::new();
    for child in children {
        match cast(child, entries.get(child.name())) {
            Ok(v) => {
                cast_entries.insert(child.name().to_string(), v);
            }
            Err(e) => {
                let segment = PathSegment::Key(child.name().to_string());
                nested.extend(e.into_nested(segment, child));
            }
        }
    }

    if !nested.is_empty() {
        return Err(CastError::Invalid {
            type_name: TypeTag::Hash.human_name(),
            nested,
        });
    }

    if !filter.options().get_strip().unwrap_or(true) {
        for (key, v) in entries {
            if !children.contains(key) {
                cast_entries.insert(key.clone(), v.clone());
            }
        }
    }
    Ok(Value::Hash(cast_entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_set::FilterSet;
    use crate::options::Options;
    use serde_json::json;

    fn integer_array() -> Filter {
        Filter::new(
            "ids",
            TypeTag::Array,
            Options::new(),
            Some(&|set: &mut FilterSet| set.integer("id", Options::new())),
        )
        .unwrap()
    }

    fn address() -> Filter {
        Filter::new(
            "address",
            TypeTag::Hash,
            Options::new(),
            Some(&|set: &mut FilterSet| {
                set.string("street", Options::new())?;
                set.string("zip", Options::new())?;
                set.string("country", Options::new().default_value("US"))
            }),
        )
        .unwrap()
    }

    #[test]
    fn array_casts_every_element() {
        let raw = Value::from(json!([1, "2", 3.0]));
        assert_eq!(
            array(&integer_array(), &raw),
            Ok(Value::Array(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ]))
        );
    }

    #[test]
    fn array_reports_each_failing_index() {
        let raw = Value::from(json!(["x", 2, null]));
        let Err(CastError::Invalid { nested, .. }) = array(&integer_array(), &raw) else {
            panic!("expected an invalid array");
        };
        let paths: Vec<String> = nested.iter().map(|n| n.path.to_string()).collect();
        assert_eq!(paths, vec!["[0]", "[2]"]);
    }

    #[test]
    fn array_without_element_filter_passes_through() {
        let f = Filter::new("anything", TypeTag::Array, Options::new(), None).unwrap();
        let raw = Value::from(json!([1, "two", { "three": 3 }]));
        assert_eq!(array(&f, &raw), Ok(raw.clone()));
    }

    #[test]
    fn array_rejects_non_sequences() {
        assert_eq!(
            array(&integer_array(), &Value::from("1,2")),
            Err(CastError::invalid(TypeTag::Array))
        );
    }

    #[test]
    fn hash_casts_declared_keys_and_drops_others() {
        let raw = Value::from(json!({ "zip": " 02139 ", "street": "Main", "floor": 3 }));
        let cast = hash(&address(), &raw).unwrap();
        assert_eq!(
            cast,
            Value::hash([
                ("street", Value::from("Main")),
                ("zip", Value::from(" 02139 ")),
                ("country", Value::from("US")),
            ])
        );
    }

    #[test]
    fn hash_keeps_undeclared_keys_without_strip() {
        let f = Filter::new(
            "meta",
            TypeTag::Hash,
            Options::new().strip(false),
            Some(&|set: &mut FilterSet| set.integer("version", Options::new())),
        )
        .unwrap();
        let raw = Value::from(json!({ "version": "2", "source": "import" }));
        assert_eq!(
            hash(&f, &raw),
            Ok(Value::hash([
                ("version", Value::Integer(2)),
                ("source", Value::from("import")),
            ]))
        );
    }

    #[test]
    fn hash_reports_missing_children_by_key() {
        let raw = Value::from(json!({ "street": "Main" }));
        let Err(CastError::Invalid { nested, .. }) = hash(&address(), &raw) else {
            panic!("expected an invalid hash");
        };
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].path.to_string(), "zip");
        assert_eq!(nested[0].kind, crate::report::ErrorKind::Missing);
    }

    #[test]
    fn nested_paths_compose() {
        let f = Filter::new(
            "orders",
            TypeTag::Array,
            Options::new(),
            Some(&|set: &mut FilterSet| {
                set.hash("order", Options::new(), |order| {
                    order.integer("quantity", Options::new())
                })
            }),
        )
        .unwrap();
        let raw = Value::from(json!([{ "quantity": 1 }, { "quantity": "lots" }]));
        let Err(CastError::Invalid { nested, .. }) = array(&f, &raw) else {
            panic!("expected an invalid array");
        };
        assert_eq!(nested[0].path.to_string(), "[1].quantity");
        assert_eq!(nested[0].type_name, "integer");
    }
}
