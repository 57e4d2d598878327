//! JSON definition documents.
//!
//! A document is a list of filter declarations:
//!
//! ```json
//! { "filters": [
//!     { "name": "age", "type": "integer", "default": 0 },
//!     { "name": "tags", "type": "array", "children": [ { "name": "tag", "type": "string" } ] }
//! ] }
//! ```
//!
//! Every key other than `name`, `type` and `children` is an option and is
//! checked against the declared type. A `default` is always a literal.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::DefinitionError;
use crate::filter::Filter;
use crate::filter_set::FilterSet;
use crate::options::{DefaultValue, OptionValue, Options};
use crate::registry::{OptionKey, TypeTag};
use crate::value::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub filters: Vec<FilterDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub children: Vec<FilterDecl>,
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Definition {
    pub fn from_json(json: &serde_json::Value) -> Result<Self, DefinitionError> {
        Definition::deserialize(json).map_err(|e| DefinitionError::Document(e.to_string()))
    }

    /// Declare every filter of the document into a fresh set.
    pub fn build(&self) -> Result<FilterSet, DefinitionError> {
        let mut set = FilterSet::new();
        for decl in &self.filters {
            set.add(decl.build()?)?;
        }
        tracing::debug!(filters = set.len(), "definition loaded");
        Ok(set)
    }
}

impl FromStr for Definition {
    type Err = DefinitionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(text).map_err(|e| DefinitionError::Document(e.to_string()))
    }
}

impl FilterDecl {
    pub fn build(&self) -> Result<Filter, DefinitionError> {
        let tag: TypeTag = self.type_name.parse()?;
        let mut options = Options::new();
        for (key, value) in &self.options {
            options.set(self.option(tag, key, value)?);
        }

        let children = |set: &mut FilterSet| -> Result<(), DefinitionError> {
            for child in &self.children {
                set.add(child.build()?)?;
            }
            Ok(())
        };
        let block = if self.children.is_empty() {
            None
        } else {
            Some(&children as &dyn Fn(&mut FilterSet) -> Result<(), DefinitionError>)
        };
        Filter::new(self.name.as_str(), tag, options, block)
    }

    fn option(
        &self,
        tag: TypeTag,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<OptionValue, DefinitionError> {
        let option =
            OptionKey::from_name(key).ok_or_else(|| DefinitionError::UnrecognizedOption {
                filter: self.name.clone(),
                tag,
                option: key.to_string(),
            })?;
        let invalid = |expected: &str| DefinitionError::InvalidOptionValue {
            filter: self.name.clone(),
            option,
            message: format!("expected {}, got {}", expected, json_type_name(value)),
        };

        let string = || text(value).ok_or_else(|| invalid("a string"));
        let number = || count(value).ok_or_else(|| invalid("a positive integer"));

        let parsed = match option {
            OptionKey::Default => {
                OptionValue::Default(DefaultValue::Value(Value::from_json(value)))
            }
            OptionKey::Desc => OptionValue::Desc(string()?),
            OptionKey::Format => OptionValue::Format(string()?),
            OptionKey::Class => OptionValue::Class(string()?),
            OptionKey::Methods => {
                let methods = value
                    .as_array()
                    .and_then(|items| items.iter().map(text).collect::<Option<Vec<_>>>())
                    .ok_or_else(|| invalid("a list of strings"))?;
                OptionValue::Methods(methods)
            }
            OptionKey::Strip => {
                OptionValue::Strip(value.as_bool().ok_or_else(|| invalid("a boolean"))?)
            }
            OptionKey::Digits => OptionValue::Digits(number()?),
            OptionKey::Base => OptionValue::Base(number()?),
        };
        Ok(parsed)
    }
}

impl FilterSet {
    /// Build a set from a parsed definition document.
    pub fn from_definition(definition: &Definition) -> Result<FilterSet, DefinitionError> {
        definition.build()
    }
}

fn text(value: &serde_json::Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn count(value: &serde_json::Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
