//! Coercion rules for boolean, numeric, string and symbol filters.
//!
//! Each rule returns `None` when the value cannot be represented; the
//! dispatcher turns that into an `Invalid` failure.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::value::Value;

/// `true`/`false`, `1`/`0` and their string forms. Nothing else.
pub(super) fn boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::Integer(1) => Some(Value::Bool(true)),
        Value::Integer(0) => Some(Value::Bool(false)),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Integers pass through; floats, decimals and strings must denote an
/// integral value exactly. Nothing is truncated.
pub(super) fn integer(value: &Value, base: u32) -> Option<Value> {
    match value {
        Value::Integer(i) => Some(Value::Integer(*i)),
        Value::Float(f) => integral_float(*f).map(Value::Integer),
        Value::Decimal(d) if d.fract().is_zero() => d.to_i64().map(Value::Integer),
        Value::String(s) => i64::from_str_radix(s.trim(), base).ok().map(Value::Integer),
        _ => None,
    }
}

fn integral_float(f: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the bound is exclusive.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Only finite floats are accepted, whatever the source.
pub(super) fn float(value: &Value) -> Option<Value> {
    match value {
        Value::Float(f) if f.is_finite() => Some(Value::Float(*f)),
        Value::Integer(i) => Some(Value::Float(*i as f64)),
        Value::Decimal(d) => d.to_f64().map(Value::Float),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        _ => None,
    }
}

/// Decimals pass through unchanged. Other numerics and numeric strings are
/// converted, then rounded to `digits` significant digits when given.
pub(super) fn decimal(value: &Value, digits: Option<u32>) -> Option<Value> {
    let converted = match value {
        Value::Decimal(d) => return Some(Value::Decimal(*d)),
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::from_f64(*f),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }?;
    let rounded = match digits {
        Some(digits) => converted.round_sf(digits)?,
        None => converted,
    };
    Some(Value::Decimal(rounded))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Strings pass through verbatim unless `strip` asks for surrounding
/// whitespace to be trimmed. Symbols become their name.
pub(super) fn string(value: &Value, strip: bool) -> Option<Value> {
    match value {
        Value::String(s) if strip => Some(Value::String(s.trim().to_string())),
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Symbol(name) => Some(Value::String(name.clone())),
        _ => None,
    }
}

pub(super) fn symbol(value: &Value) -> Option<Value> {
    match value {
        Value::Symbol(name) | Value::String(name) => Some(Value::Symbol(name.clone())),
        Value::Object(object) => object.symbol_name().map(Value::symbol),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::HostObject;
    use std::any::Any;

    #[test]
    fn boolean_literals() {
        for (raw, expected) in [
            (Value::Bool(true), true),
            (Value::Bool(false), false),
            (Value::from("true"), true),
            (Value::from("FALSE"), false),
            (Value::from("1"), true),
            (Value::from("0"), false),
            (Value::Integer(1), true),
            (Value::Integer(0), false),
        ] {
            assert_eq!(boolean(&raw), Some(Value::Bool(expected)), "{:?}", raw);
        }
    }

    #[test]
    fn boolean_rejects_everything_else() {
        for raw in [
            Value::from("yes"),
            Value::from(""),
            Value::Integer(2),
            Value::Float(1.0),
            Value::Array(vec![]),
        ] {
            assert_eq!(boolean(&raw), None, "{:?}", raw);
        }
    }

    #[test]
    fn integer_from_numeric_string() {
        assert_eq!(integer(&Value::from("42"), 10), Some(Value::Integer(42)));
        assert_eq!(integer(&Value::from(" -7 "), 10), Some(Value::Integer(-7)));
    }

    #[test]
    fn integer_rejects_fractional_input() {
        assert_eq!(integer(&Value::from("4.2"), 10), None);
        assert_eq!(integer(&Value::from("1.5"), 10), None);
        assert_eq!(integer(&Value::Float(1.5), 10), None);
        assert_eq!(integer(&Value::Decimal(Decimal::new(15, 1)), 10), None);
    }

    #[test]
    fn integer_accepts_integral_floats_and_decimals() {
        assert_eq!(integer(&Value::Float(3.0), 10), Some(Value::Integer(3)));
        assert_eq!(
            integer(&Value::Decimal(Decimal::new(300, 2)), 10),
            Some(Value::Integer(3))
        );
    }

    #[test]
    fn integer_rejects_out_of_range_floats() {
        assert_eq!(integer(&Value::Float(1e20), 10), None);
        assert_eq!(integer(&Value::Float(f64::NAN), 10), None);
    }

    #[test]
    fn integer_honours_base() {
        assert_eq!(integer(&Value::from("ff"), 16), Some(Value::Integer(255)));
        assert_eq!(integer(&Value::from("102"), 2), None);
    }

    #[test]
    fn float_conversions() {
        assert_eq!(float(&Value::Integer(0)), Some(Value::Float(0.0)));
        assert_eq!(float(&Value::from("2.5")), Some(Value::Float(2.5)));
        assert_eq!(float(&Value::from("abc")), None);
        assert_eq!(float(&Value::from("inf")), None);
        assert_eq!(float(&Value::Bool(true)), None);
    }

    #[test]
    fn float_rejects_non_finite_values() {
        assert_eq!(float(&Value::Float(1.5)), Some(Value::Float(1.5)));
        assert_eq!(float(&Value::Float(f64::NAN)), None);
        assert_eq!(float(&Value::Float(f64::INFINITY)), None);
        assert_eq!(float(&Value::Float(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn decimal_conversions() {
        assert_eq!(
            decimal(&Value::from("12.50"), None),
            Some(Value::Decimal(Decimal::new(1250, 2)))
        );
        assert_eq!(
            decimal(&Value::from("1e3"), None),
            Some(Value::Decimal(Decimal::from(1000)))
        );
        assert_eq!(decimal(&Value::from("twelve"), None), None);
    }

    #[test]
    fn decimal_rounds_to_significant_digits() {
        assert_eq!(
            decimal(&Value::from("3.14159"), Some(3)),
            Some(Value::Decimal(Decimal::new(314, 2)))
        );
    }

    #[test]
    fn decimal_identity_ignores_digits() {
        let d = Value::Decimal(Decimal::new(314159, 5));
        assert_eq!(decimal(&d, Some(2)), Some(d));
    }

    #[test]
    fn string_strips_by_request() {
        assert_eq!(string(&Value::from("  hi "), true), Some(Value::from("hi")));
        assert_eq!(
            string(&Value::from("  hi "), false),
            Some(Value::from("  hi "))
        );
        assert_eq!(string(&Value::symbol("draft"), true), Some(Value::from("draft")));
        assert_eq!(string(&Value::Integer(1), true), None);
    }

    #[derive(Debug)]
    struct Status;

    impl HostObject for Status {
        fn class_name(&self) -> &str {
            "Status"
        }

        fn symbol_name(&self) -> Option<&str> {
            Some("active")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn symbol_from_names() {
        assert_eq!(symbol(&Value::from("draft")), Some(Value::symbol("draft")));
        assert_eq!(symbol(&Value::object(Status)), Some(Value::symbol("active")));
        assert_eq!(symbol(&Value::Integer(3)), None);
    }
}
