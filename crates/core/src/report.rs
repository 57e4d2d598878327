//! The error report produced by a validation pass.
//!
//! A report is an ordered list of entries, one per failing top-level
//! attribute. Failures inside arrays and hashes keep their position in the
//! entry's [`AttributePath`] (`tags[2]`, `address.zip`) and the full list of
//! nested failures in its metadata.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::cast::CastError;

// ──────────────────────────────────────────────
// Paths
// ──────────────────────────────────────────────

/// One step into a composite value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the input, rendered as `address.zip` or
/// `tags[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttributePath(Vec<PathSegment>);

impl AttributePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path naming a top-level attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        AttributePath(vec![PathSegment::Key(name.into())])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The top-level attribute this path starts at.
    pub fn root(&self) -> Option<&str> {
        match self.0.first() {
            Some(PathSegment::Key(name)) => Some(name),
            _ => None,
        }
    }

    /// Prepend `segment`, turning a path relative to a child into one
    /// relative to its parent.
    pub fn prefixed(mut self, segment: PathSegment) -> Self {
        self.0.insert(0, segment);
        self
    }

    /// Append every segment of `rest`.
    pub fn join(&self, rest: &AttributePath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(rest.0.iter().cloned());
        AttributePath(segments)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ──────────────────────────────────────────────
// Entries
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No value and no usable default.
    Missing,
    /// A value that cannot be represented as the declared type.
    Invalid,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure inside a composite value. Inside a [`CastError`] the path is
/// relative to the composite; inside an [`ErrorEntry`] it is absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedError {
    pub path: AttributePath,
    pub kind: ErrorKind,
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

impl NestedError {
    pub fn message(&self) -> String {
        message_for(self.kind, self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorMetadata {
    /// Human-readable name of the type the value failed to cast to.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<NestedError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub path: AttributePath,
    pub kind: ErrorKind,
    pub message: String,
    pub metadata: ErrorMetadata,
}

impl ErrorEntry {
    /// The attribute name followed by the message: "tags[2] is not a valid integer".
    pub fn full_message(&self) -> String {
        format!("{} {}", self.path, self.message)
    }
}

fn message_for(kind: ErrorKind, type_name: &str) -> String {
    match kind {
        ErrorKind::Missing => "is required".to_string(),
        ErrorKind::Invalid => format!("is not a valid {}", type_name),
    }
}

// ──────────────────────────────────────────────
// Report
// ──────────────────────────────────────────────

/// Ordered per-attribute validation failures. Empty means valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    entries: Vec<ErrorEntry>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ErrorEntry) {
        self.entries.push(entry);
    }

    /// Fold a failed cast of the attribute `name` (declared as
    /// `type_name`) into one entry.
    ///
    /// A composite failure is reported at the path of its first nested
    /// failure; all nested failures are kept in the metadata. The entry is
    /// always `invalid`, so its message and type describe the value at that
    /// path as invalid even when the nested failure is a missing key.
    pub fn record(&mut self, name: &str, type_name: &'static str, error: CastError) {
        let root = AttributePath::attribute(name);
        let entry = match error {
            CastError::Missing => ErrorEntry {
                path: root,
                kind: ErrorKind::Missing,
                message: message_for(ErrorKind::Missing, type_name),
                metadata: ErrorMetadata::default(),
            },
            CastError::Invalid { type_name, nested } if nested.is_empty() => ErrorEntry {
                path: root,
                kind: ErrorKind::Invalid,
                message: message_for(ErrorKind::Invalid, type_name),
                metadata: ErrorMetadata {
                    type_name: Some(type_name),
                    nested,
                },
            },
            CastError::Invalid { nested, .. } => {
                let nested: Vec<NestedError> = nested
                    .into_iter()
                    .map(|n| NestedError {
                        path: root.join(&n.path),
                        ..n
                    })
                    .collect();
                let first = &nested[0];
                ErrorEntry {
                    path: first.path.clone(),
                    kind: ErrorKind::Invalid,
                    message: message_for(ErrorKind::Invalid, first.type_name),
                    metadata: ErrorMetadata {
                        type_name: Some(first.type_name),
                        nested,
                    },
                }
            }
        };
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A report with no entries means every attribute cast cleanly.
    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorEntry> {
        self.entries.iter()
    }

    /// Entries whose path starts at the attribute `name`.
    pub fn for_attribute<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ErrorEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.path.root() == Some(name))
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(ErrorEntry::full_message).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_render_keys_and_indices() {
        let rest = AttributePath::new()
            .prefixed(PathSegment::Key("zip".to_string()))
            .prefixed(PathSegment::Index(3));
        let path = AttributePath::attribute("orders").join(&rest);
        assert_eq!(path.to_string(), "orders[3].zip");
        assert_eq!(path.root(), Some("orders"));
    }

    #[test]
    fn prefixed_paths_nest_outward() {
        let path = AttributePath::new()
            .prefixed(PathSegment::Index(1))
            .prefixed(PathSegment::Key("line".to_string()));
        assert_eq!(path.to_string(), "line[1]");
    }

    #[test]
    fn missing_records_without_type_metadata() {
        let mut report = ErrorReport::new();
        report.record("amount", "float", CastError::Missing);
        let entry = &report.entries()[0];
        assert_eq!(entry.kind, ErrorKind::Missing);
        assert_eq!(entry.full_message(), "amount is required");
        assert_eq!(entry.metadata.type_name, None);
    }

    #[test]
    fn composite_failures_collapse_into_one_entry() {
        let mut report = ErrorReport::new();
        report.record(
            "address",
            "hash",
            CastError::Invalid {
                type_name: "hash",
                nested: vec![
                    NestedError {
                        path: AttributePath::new().prefixed(PathSegment::Key("zip".to_string())),
                        kind: ErrorKind::Missing,
                        type_name: "string",
                    },
                    NestedError {
                        path: AttributePath::new().prefixed(PathSegment::Key("unit".to_string())),
                        kind: ErrorKind::Invalid,
                        type_name: "integer",
                    },
                ],
            },
        );
        assert_eq!(report.len(), 1);
        let entry = &report.entries()[0];
        assert_eq!(entry.path.to_string(), "address.zip");
        assert_eq!(entry.kind, ErrorKind::Invalid);
        assert_eq!(entry.message, "is not a valid string");
        assert_eq!(entry.metadata.type_name, Some("string"));
        assert_eq!(entry.metadata.nested.len(), 2);
        assert_eq!(entry.metadata.nested[0].kind, ErrorKind::Missing);
        assert_eq!(entry.metadata.nested[1].path.to_string(), "address.unit");
    }

    #[test]
    fn report_serializes_as_a_list() {
        let mut report = ErrorReport::new();
        report.record(
            "age",
            "integer",
            CastError::Invalid {
                type_name: "integer",
                nested: vec![],
            },
        );
        assert_eq!(
            report.to_json(),
            json!([{
                "path": "age",
                "kind": "invalid",
                "message": "is not a valid integer",
                "metadata": { "type": "integer" }
            }])
        );
    }
}
