//! intake-core: typed input filters for interactions.
//!
//! A [`FilterSet`] declares the named, typed inputs an interaction accepts.
//! The validation pass casts a raw input map against the set, producing
//! the typed attributes plus an [`ErrorReport`] of every attribute that was
//! missing or could not be cast.
//!
//! # Public API
//!
//! - [`FilterSet`] -- declare, inherit and import filters
//! - [`Filter`], [`Options`], [`TypeTag`] -- one filter and its configuration
//! - [`cast()`] -- cast one raw value for one filter
//! - [`process()`], [`validate()`] -- run the validation pass
//! - [`Definition`] -- load a filter set from a JSON definition document
//! - [`DefinitionError`], [`UsageError`], [`CastError`] -- failure types

pub mod cast;
pub mod definition;
pub mod error;
pub mod filter;
pub mod filter_set;
pub mod options;
pub mod registry;
pub mod report;
pub mod validate;
pub mod value;

// ── Convenience re-exports: key types ────────────────────────────────

pub use cast::CastError;
pub use definition::{Definition, FilterDecl};
pub use error::{DefinitionError, UsageError};
pub use filter::{is_reserved, Block, Filter, RESERVED_PREFIX};
pub use filter_set::FilterSet;
pub use options::{DefaultValue, OptionValue, Options};
pub use registry::{OptionKey, TypeTag};
pub use report::{AttributePath, ErrorEntry, ErrorKind, ErrorMetadata, ErrorReport, NestedError};
pub use validate::Validated;
pub use value::{HostObject, Value};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use cast::cast;
pub use validate::{process, process_json, validate};
