//! Rules for host objects. None of them converts anything: the value is
//! either accepted as-is or rejected.

use crate::value::Value;

/// Accept an object that is an instance of `class`.
pub(super) fn model(value: &Value, class: &str) -> Option<Value> {
    match value {
        Value::Object(object) if object.is_a(class) => Some(value.clone()),
        _ => None,
    }
}

/// Accept an object that responds to every one of `methods`.
pub(super) fn interface(value: &Value, methods: &[String]) -> Option<Value> {
    match value {
        Value::Object(object) if methods.iter().all(|m| object.responds_to(m)) => {
            Some(value.clone())
        }
        _ => None,
    }
}

/// Accept raw bytes, or an object that can be read from.
pub(super) fn file(value: &Value) -> Option<Value> {
    match value {
        Value::Bytes(_) => Some(value.clone()),
        Value::Object(object) if object.responds_to("read") => Some(value.clone()),
        _ => None,
    }
}
