//! The dynamic value model shared by raw inputs and cast attributes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

// ──────────────────────────────────────────────
// Host objects
// ──────────────────────────────────────────────

/// An instance supplied by the host application rather than decoded from
/// data: a record, a service handle, an open file.
///
/// Model filters match on [`is_a`](HostObject::is_a), interface filters on
/// [`responds_to`](HostObject::responds_to). Neither ever converts the
/// object.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Name of the object's concrete class.
    fn class_name(&self) -> &str;

    /// Whether the object is an instance of `class`. Implementors with a
    /// class hierarchy should also answer for ancestors.
    fn is_a(&self, class: &str) -> bool {
        self.class_name() == class
    }

    /// Whether the object supports the named operation.
    fn responds_to(&self, _operation: &str) -> bool {
        false
    }

    /// A name usable as a symbol, for objects that have one.
    fn symbol_name(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A raw input or a cast attribute.
///
/// Raw inputs are usually built from JSON (see [`Value::from_json`]); cast
/// attributes always carry the representation of their filter's type.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Symbol(String),
    Date(Date),
    DateTime(OffsetDateTime),
    Time(OffsetDateTime),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Hash(IndexMap<String, Value>),
    Object(Arc<dyn HostObject>),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn object(object: impl HostObject + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Build a hash from key/value pairs, keeping their order.
    pub fn hash<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Hash(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date time",
            Value::Time(_) => "time",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Hash(_) => "hash",
            Value::Object(_) => "object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_hash(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Hash(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Index into a hash value; `None` for missing keys and non-hashes.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_hash().and_then(|entries| entries.get(key))
    }

    /// Convert decoded JSON into a raw input value.
    ///
    /// Integral numbers that fit in an `i64` become `Integer`, all other
    /// numbers `Float`. Object keys keep the order serde_json yields.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Nil),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Hash(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a value to JSON for output.
    ///
    /// Decimals are written as strings so no precision is lost; dates use
    /// `YYYY-MM-DD` and instants RFC 3339. Host objects have no data
    /// representation and are written as `#<ClassName>`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::json!(b),
            Value::Integer(i) => serde_json::json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Decimal(d) => serde_json::json!(d.to_string()),
            Value::String(s) | Value::Symbol(s) => serde_json::json!(s),
            Value::Date(d) => {
                let text = d
                    .format(format_description!("[year]-[month]-[day]"))
                    .unwrap_or_else(|_| d.to_string());
                serde_json::json!(text)
            }
            Value::DateTime(t) | Value::Time(t) => {
                let text = t.format(&Rfc3339).unwrap_or_else(|_| t.to_string());
                serde_json::json!(text)
            }
            Value::Bytes(bytes) => serde_json::json!(bytes),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Hash(entries) => {
                let mut map = serde_json::Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
            Value::Object(object) => serde_json::json!(format!("#<{}>", object.class_name())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            // Host objects have identity, not structure.
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Hash(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Account;

    impl HostObject for Account {
        fn class_name(&self) -> &str {
            "Account"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn json_numbers_split_into_integer_and_float() {
        assert_eq!(Value::from_json(&json!(42)), Value::Integer(42));
        assert_eq!(Value::from_json(&json!(4.5)), Value::Float(4.5));
        assert_eq!(
            Value::from_json(&json!(u64::MAX)),
            Value::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn json_objects_become_hashes() {
        let value = Value::from_json(&json!({ "zip": "02139", "tags": [1, null] }));
        assert_eq!(value.get("zip"), Some(&Value::from("02139")));
        assert_eq!(
            value.get("tags"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Nil]))
        );
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(Account);
        let b = Value::object(Account);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn to_json_renders_typed_values() {
        let date = Date::from_calendar_date(2024, time::Month::March, 9).unwrap();
        assert_eq!(Value::Date(date).to_json(), json!("2024-03-09"));
        assert_eq!(
            Value::Decimal(Decimal::new(1050, 2)).to_json(),
            json!("10.50")
        );
        assert_eq!(Value::symbol("draft").to_json(), json!("draft"));
        assert_eq!(Value::object(Account).to_json(), json!("#<Account>"));
    }
}
