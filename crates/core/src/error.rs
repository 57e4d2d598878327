//! Definition-time and call-time errors.
//!
//! Per-field cast failures are not errors in this sense: they are
//! [`CastError`](crate::cast::CastError) values that the validation pass
//! folds into an [`ErrorReport`](crate::report::ErrorReport).

use crate::registry::{OptionKey, TypeTag};

/// A filter definition is malformed. Raised while filters are declared,
/// never while inputs are cast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The type name does not name any registered filter type.
    #[error("unknown filter type '{0}'")]
    UnknownType(String),

    /// The option key is not one the filter's type understands.
    #[error("option '{option}' is not recognized by {tag} filter '{filter}'")]
    UnrecognizedOption {
        filter: String,
        tag: TypeTag,
        option: String,
    },

    /// The option key is known but its value is unusable.
    #[error("option '{option}' of filter '{filter}' is invalid: {message}")]
    InvalidOptionValue {
        filter: String,
        option: OptionKey,
        message: String,
    },

    /// A filter with the same name already exists in the set.
    #[error("filter '{0}' is already defined")]
    DuplicateFilter(String),

    /// The name collides with the interaction layer's internal prefix.
    #[error("filter name '{0}' is reserved")]
    ReservedName(String),

    #[error("filter name must not be empty")]
    EmptyName,

    /// The declared default does not survive its own filter's cast.
    #[error("default value of filter '{filter}' is invalid: {reason}")]
    InvalidDefault { filter: String, reason: String },

    /// Both an inclusion and an exclusion list were given to an import.
    #[error("import accepts either 'only' or 'except', not both")]
    AmbiguousImport,

    /// A nested block was given to a type that has no children.
    #[error("{tag} filter '{filter}' does not take nested filters")]
    UnexpectedBlock { filter: String, tag: TypeTag },

    /// An array filter declared more than one element filter.
    #[error("array filter '{filter}' takes at most one nested filter, got {count}")]
    TooManyChildren { filter: String, count: usize },

    /// A definition document could not be read.
    #[error("malformed definition document: {0}")]
    Document(String),
}

/// The caller handed the validation pass something it cannot work with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("inputs must be a hash, got {0}")]
    NotAMapping(&'static str),
}
