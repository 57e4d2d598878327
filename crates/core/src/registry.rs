//! The closed set of filter types and the options each one understands.
//!
//! Every type a filter can declare is a [`TypeTag`] variant. String names
//! (from definition documents) are resolved here and nowhere else.

use std::fmt;
use std::str::FromStr;

use crate::error::DefinitionError;
use crate::value::Value;

/// A registered filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Boolean,
    Integer,
    Float,
    Decimal,
    String,
    Symbol,
    Date,
    DateTime,
    Time,
    Array,
    Hash,
    Model,
    File,
    Interface,
}

/// An option key a filter declaration may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Default,
    Desc,
    Format,
    Class,
    Methods,
    Strip,
    Digits,
    Base,
}

const COMMON: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc];
const INTEGER: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Base];
const DECIMAL: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Digits];
const STRIPPED: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Strip];
const TEMPORAL: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Format];
const MODEL: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Class];
const INTERFACE: &[OptionKey] = &[OptionKey::Default, OptionKey::Desc, OptionKey::Methods];

impl TypeTag {
    pub const ALL: [TypeTag; 14] = [
        TypeTag::Boolean,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::Decimal,
        TypeTag::String,
        TypeTag::Symbol,
        TypeTag::Date,
        TypeTag::DateTime,
        TypeTag::Time,
        TypeTag::Array,
        TypeTag::Hash,
        TypeTag::Model,
        TypeTag::File,
        TypeTag::Interface,
    ];

    /// The name used in definition documents.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Date => "date",
            TypeTag::DateTime => "date_time",
            TypeTag::Time => "time",
            TypeTag::Array => "array",
            TypeTag::Hash => "hash",
            TypeTag::Model => "model",
            TypeTag::File => "file",
            TypeTag::Interface => "interface",
        }
    }

    /// The name used in error messages ("is not a valid date time").
    pub fn human_name(self) -> &'static str {
        match self {
            TypeTag::DateTime => "date time",
            other => other.as_str(),
        }
    }

    pub fn recognized_options(self) -> &'static [OptionKey] {
        match self {
            TypeTag::Integer => INTEGER,
            TypeTag::Decimal => DECIMAL,
            TypeTag::String | TypeTag::Hash => STRIPPED,
            TypeTag::Date | TypeTag::DateTime | TypeTag::Time => TEMPORAL,
            TypeTag::Model => MODEL,
            TypeTag::Interface => INTERFACE,
            TypeTag::Boolean
            | TypeTag::Float
            | TypeTag::Symbol
            | TypeTag::Array
            | TypeTag::File => COMMON,
        }
    }

    pub fn recognizes(self, key: OptionKey) -> bool {
        self.recognized_options().contains(&key)
    }

    /// Composite types own nested filters declared in a block.
    pub fn is_composite(self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::Hash)
    }

    /// Whether `value` has this type's cast representation.
    ///
    /// Model, interface and file filters check capabilities rather than
    /// representation, so only the carrier variant is checked here.
    pub fn represents(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeTag::Boolean, Value::Bool(_))
                | (TypeTag::Integer, Value::Integer(_))
                | (TypeTag::Float, Value::Float(_))
                | (TypeTag::Decimal, Value::Decimal(_))
                | (TypeTag::String, Value::String(_))
                | (TypeTag::Symbol, Value::Symbol(_))
                | (TypeTag::Date, Value::Date(_))
                | (TypeTag::DateTime, Value::DateTime(_))
                | (TypeTag::Time, Value::Time(_))
                | (TypeTag::Array, Value::Array(_))
                | (TypeTag::Hash, Value::Hash(_))
                | (TypeTag::Model, Value::Object(_))
                | (TypeTag::Interface, Value::Object(_))
                | (TypeTag::File, Value::Object(_) | Value::Bytes(_))
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "datetime" => Ok(TypeTag::DateTime),
            "object" => Ok(TypeTag::Model),
            _ => TypeTag::ALL
                .into_iter()
                .find(|tag| tag.as_str() == s)
                .ok_or_else(|| DefinitionError::UnknownType(s.to_string())),
        }
    }
}

impl OptionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::Default => "default",
            OptionKey::Desc => "desc",
            OptionKey::Format => "format",
            OptionKey::Class => "class",
            OptionKey::Methods => "methods",
            OptionKey::Strip => "strip",
            OptionKey::Digits => "digits",
            OptionKey::Base => "base",
        }
    }

    pub fn from_name(name: &str) -> Option<OptionKey> {
        [
            OptionKey::Default,
            OptionKey::Desc,
            OptionKey::Format,
            OptionKey::Class,
            OptionKey::Methods,
            OptionKey::Strip,
            OptionKey::Digits,
            OptionKey::Base,
        ]
        .into_iter()
        .find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_round_trips_through_its_name() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.as_str().parse::<TypeTag>(), Ok(tag));
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!("datetime".parse::<TypeTag>(), Ok(TypeTag::DateTime));
        assert_eq!("object".parse::<TypeTag>(), Ok(TypeTag::Model));
    }

    #[test]
    fn unknown_type_is_a_definition_error() {
        assert_eq!(
            "uuid".parse::<TypeTag>(),
            Err(DefinitionError::UnknownType("uuid".to_string()))
        );
    }

    #[test]
    fn every_tag_accepts_default_and_desc() {
        for tag in TypeTag::ALL {
            assert!(tag.recognizes(OptionKey::Default), "{tag}");
            assert!(tag.recognizes(OptionKey::Desc), "{tag}");
        }
    }

    #[test]
    fn type_specific_options() {
        assert!(TypeTag::Date.recognizes(OptionKey::Format));
        assert!(!TypeTag::Integer.recognizes(OptionKey::Format));
        assert!(TypeTag::Integer.recognizes(OptionKey::Base));
        assert!(TypeTag::Decimal.recognizes(OptionKey::Digits));
        assert!(TypeTag::Hash.recognizes(OptionKey::Strip));
        assert!(!TypeTag::Array.recognizes(OptionKey::Strip));
        assert!(TypeTag::Model.recognizes(OptionKey::Class));
        assert!(TypeTag::Interface.recognizes(OptionKey::Methods));
    }

    #[test]
    fn option_names_resolve() {
        assert_eq!(OptionKey::from_name("digits"), Some(OptionKey::Digits));
        assert_eq!(OptionKey::from_name("precision"), None);
    }
}
