//! Filter descriptors: one named, typed input.

use crate::cast::temporal::DatePattern;
use crate::cast::{cast_present, CastError};
use crate::error::DefinitionError;
use crate::filter_set::FilterSet;
use crate::options::Options;
use crate::registry::{OptionKey, TypeTag};
use crate::value::Value;

/// Declares the children of a composite filter. Runs once, while the
/// filter is constructed.
pub type Block<'a> = &'a dyn Fn(&mut FilterSet) -> Result<(), DefinitionError>;

/// Attribute names starting with this prefix belong to the interaction
/// layer itself.
pub const RESERVED_PREFIX: &str = "_interaction_";

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// An immutable description of one input: its name, type, options and,
/// for arrays and hashes, its nested filters.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    tag: TypeTag,
    options: Options,
    children: FilterSet,
    pattern: Option<DatePattern>,
    class: Option<String>,
}

impl Filter {
    /// Build a filter, checking the name, the options against the type,
    /// and the default against the filter's own cast.
    pub fn new(
        name: impl Into<String>,
        tag: TypeTag,
        options: Options,
        block: Option<Block<'_>>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        if is_reserved(&name) {
            return Err(DefinitionError::ReservedName(name));
        }
        if let Some(key) = options.keys().find(|key| !tag.recognizes(*key)) {
            return Err(DefinitionError::UnrecognizedOption {
                filter: name,
                tag,
                option: key.as_str().to_string(),
            });
        }
        check_option_values(&name, &options)?;

        let pattern = match options.get_format() {
            Some(format) => Some(DatePattern::compile(format).map_err(|message| {
                DefinitionError::InvalidOptionValue {
                    filter: name.clone(),
                    option: OptionKey::Format,
                    message,
                }
            })?),
            None => None,
        };
        let class = (tag == TypeTag::Model).then(|| {
            options
                .get_class()
                .map(str::to_string)
                .unwrap_or_else(|| camelize(&name))
        });

        let mut children = FilterSet::new();
        if let Some(block) = block {
            if !tag.is_composite() {
                return Err(DefinitionError::UnexpectedBlock { filter: name, tag });
            }
            block(&mut children)?;
        }
        if tag == TypeTag::Array && children.len() > 1 {
            return Err(DefinitionError::TooManyChildren {
                filter: name,
                count: children.len(),
            });
        }

        let filter = Filter {
            name,
            tag,
            options,
            children,
            pattern,
            class,
        };
        if let Err(error) = filter.default() {
            return Err(DefinitionError::InvalidDefault {
                filter: filter.name,
                reason: error.to_string(),
            });
        }

        tracing::debug!(
            filter = %filter.name,
            tag = %filter.tag,
            children = filter.children.len(),
            "filter declared"
        );
        Ok(filter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Nested filters; empty for non-composite types.
    pub fn children(&self) -> &FilterSet {
        &self.children
    }

    /// The element filter of an array, if one was declared.
    pub fn element(&self) -> Option<&Filter> {
        match self.tag {
            TypeTag::Array => self.children.iter().next(),
            _ => None,
        }
    }

    pub fn desc(&self) -> Option<&str> {
        self.options.get_desc()
    }

    /// The class a model filter requires.
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub(crate) fn pattern(&self) -> Option<&DatePattern> {
        self.pattern.as_ref()
    }

    /// The `format` a temporal filter parses strings with.
    pub fn format(&self) -> Option<&str> {
        self.pattern.as_ref().map(DatePattern::as_str)
    }

    pub fn has_default(&self) -> bool {
        self.options.contains(OptionKey::Default)
    }

    /// Resolve and cast the default value.
    ///
    /// `Ok(None)` when no default was declared. A `Nil` default is returned
    /// as-is and marks the filter optional.
    pub fn default(&self) -> Result<Option<Value>, CastError> {
        let Some(default) = self.options.get_default() else {
            return Ok(None);
        };
        match default.resolve() {
            Value::Nil => Ok(Some(Value::Nil)),
            value => cast_present(self, &value).map(Some),
        }
    }
}

fn check_option_values(name: &str, options: &Options) -> Result<(), DefinitionError> {
    let invalid = |option: OptionKey, message: &str| DefinitionError::InvalidOptionValue {
        filter: name.to_string(),
        option,
        message: message.to_string(),
    };
    if let Some(base) = options.get_base() {
        if !(2..=36).contains(&base) {
            return Err(invalid(OptionKey::Base, "base must be between 2 and 36"));
        }
    }
    // rust_decimal holds at most 28 significant digits.
    if let Some(digits) = options.get_digits() {
        if !(1..=28).contains(&digits) {
            return Err(invalid(OptionKey::Digits, "digits must be between 1 and 28"));
        }
    }
    if options.get_class() == Some("") {
        return Err(invalid(OptionKey::Class, "class must not be empty"));
    }
    if options.get_methods().iter().any(String::is_empty) {
        return Err(invalid(OptionKey::Methods, "method names must not be empty"));
    }
    Ok(())
}

/// `user_account` -> `UserAccount`.
fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
