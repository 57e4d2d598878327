//! The casting engine: raw value in, typed value or failure out.
//!
//! [`cast`] handles absent values and defaults, then dispatches on the
//! filter's [`TypeTag`] to one coercion rule per type. Composite rules call
//! back into [`cast`] for every nested value.

mod composite;
mod object;
mod scalar;
pub mod temporal;

use std::fmt;

use crate::filter::Filter;
use crate::registry::TypeTag;
use crate::report::{AttributePath, ErrorKind, NestedError, PathSegment};
use crate::value::Value;

/// Why a value could not be cast. Never escapes the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    /// No value was given and the filter has no default.
    Missing,
    /// The value is present but not representable as `type_name`. For
    /// composites, `nested` lists every failing element with a path
    /// relative to the composite.
    Invalid {
        type_name: &'static str,
        nested: Vec<NestedError>,
    },
}

impl CastError {
    pub fn invalid(tag: TypeTag) -> Self {
        CastError::Invalid {
            type_name: tag.human_name(),
            nested: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CastError::Missing => ErrorKind::Missing,
            CastError::Invalid { .. } => ErrorKind::Invalid,
        }
    }

    /// Re-root this failure of `child` one level down, under `segment`.
    pub(crate) fn into_nested(self, segment: PathSegment, child: &Filter) -> Vec<NestedError> {
        match self {
            CastError::Missing => vec![NestedError {
                path: AttributePath::new().prefixed(segment),
                kind: ErrorKind::Missing,
                type_name: child.tag().human_name(),
            }],
            CastError::Invalid { type_name, nested } if nested.is_empty() => vec![NestedError {
                path: AttributePath::new().prefixed(segment),
                kind: ErrorKind::Invalid,
                type_name,
            }],
            CastError::Invalid { nested, .. } => nested
                .into_iter()
                .map(|n| NestedError {
                    path: n.path.prefixed(segment.clone()),
                    ..n
                })
                .collect(),
        }
    }
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastError::Missing => write!(f, "is required"),
            CastError::Invalid { type_name, nested } if nested.is_empty() => {
                write!(f, "is not a valid {}", type_name)
            }
            CastError::Invalid { nested, .. } => {
                let paths: Vec<String> = nested
                    .iter()
                    .map(|n| format!("{} {}", n.path, n.message()))
                    .collect();
                write!(f, "has invalid nested values: {}", paths.join("; "))
            }
        }
    }
}

impl std::error::Error for CastError {}

/// Cast `raw` (the value under the filter's key, if any) for `filter`.
///
/// An absent key and an explicit `Nil` are treated alike: the filter's
/// default is used when it has one, otherwise the result is `Missing`.
pub fn cast(filter: &Filter, raw: Option<&Value>) -> Result<Value, CastError> {
    match raw {
        None | Some(Value::Nil) => filter.default()?.ok_or(CastError::Missing),
        Some(value) => cast_present(filter, value),
    }
}

/// Cast a value known to be present.
pub(crate) fn cast_present(filter: &Filter, value: &Value) -> Result<Value, CastError> {
    let tag = filter.tag();
    let options = filter.options();
    let result = match tag {
        TypeTag::Boolean => scalar::boolean(value).ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Integer => scalar::integer(value, options.get_base().unwrap_or(10))
            .ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Float => scalar::float(value).ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Decimal => {
            scalar::decimal(value, options.get_digits()).ok_or_else(|| CastError::invalid(tag))
        }
        TypeTag::String => scalar::string(value, options.get_strip().unwrap_or(false))
            .ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Symbol => scalar::symbol(value).ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Date | TypeTag::DateTime | TypeTag::Time => {
            temporal::temporal(tag, value, filter.pattern()).ok_or_else(|| CastError::invalid(tag))
        }
        TypeTag::Array => composite::array(filter, value),
        TypeTag::Hash => composite::hash(filter, value),
        TypeTag::Model => object::model(value, filter.class_name().unwrap_or_default())
            .ok_or_else(|| CastError::invalid(tag)),
        TypeTag::Interface => object::interface(value, options.get_methods())
            .ok_or_else(|| CastError::invalid(tag)),
        TypeTag::File => object::file(value).ok_or_else(|| CastError::invalid(tag)),
    };

    match &result {
        Ok(cast) => debug_assert!(tag.represents(cast), "{} cast produced {:?}", tag, cast),
        Err(error) => tracing::trace!(
            filter = filter.name(),
            tag = %tag,
            got = value.type_name(),
            error = %error,
            "cast failed"
        ),
    }
    result
}
