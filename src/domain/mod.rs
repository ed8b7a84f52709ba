//! Core value types shared across the crate
//!
//! Settings documents are plain JSON-shaped key/value maps regardless of
//! the on-disk format; TOML and YAML override files are normalized into
//! [`ConfigDocument`] by the loader.

use serde::Serialize;
use serde_json::{Map, Value};

/// A flat settings document: option name to value.
///
/// Insertion order is preserved, so resolving the same inputs always
/// produces the same serialized output.
pub type ConfigDocument = Map<String, Value>;

/// Expected shape of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    /// Sequence of strings (scope selector lists).
    StrList,
    /// Mapping with string values (syntax name to scope selector).
    StrMap,
    /// Nested mapping with no validated shape (engine passthrough).
    Map,
}

impl ValueKind {
    /// Human-readable name used in error messages and `schema` output.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Str => "string",
            ValueKind::StrList => "list of strings",
            ValueKind::StrMap => "map of strings",
            ValueKind::Map => "map",
        }
    }

    /// Check a JSON value against this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueKind::Bool => value.is_boolean(),
            // Integers beyond i64 range fail the kind check rather than wrap.
            ValueKind::Int => value.is_i64(),
            ValueKind::Str => value.is_string(),
            ValueKind::StrList => match value.as_array() {
                Some(items) => items.iter().all(Value::is_string),
                None => false,
            },
            ValueKind::StrMap => match value.as_object() {
                Some(entries) => entries.values().all(Value::is_string),
                None => false,
            },
            ValueKind::Map => value.is_object(),
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Describe the shape of an arbitrary JSON value, for error messages.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Typed view of a resolved configuration, consumed by the expansion engine.
///
/// Built infallibly from a [`Config`](crate::store::Config): every field
/// is schema-validated during the merge, so construction never re-checks.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub auto_mark: bool,
    pub abbreviation_preview: bool,
    pub marker_scope: String,
    pub syntax_scopes: Vec<(String, String)>,
    pub inline_scopes: Vec<String>,
    pub abbreviation_scopes: Vec<String>,
    pub ignore_scopes: Vec<String>,
    pub tab_expand: bool,
    pub tag_preview: bool,
    pub context_size_limit: i64,
    pub wrap_size_preview: i64,
    pub comment: bool,
    pub comment_scopes: Vec<String>,
    pub max_data_url: i64,
    /// Opaque options forwarded verbatim to the expansion engine.
    pub engine_config: Value,
}

impl Settings {
    /// Whether the capture preview should be shown.
    ///
    /// `abbreviation_preview` has no effect while marking is disabled.
    pub fn preview_enabled(&self) -> bool {
        self.auto_mark && self.abbreviation_preview
    }

    /// Whether data-URL inlining is enabled at all (`max_data_url` of 0
    /// disables the feature).
    pub fn data_url_enabled(&self) -> bool {
        self.max_data_url > 0
    }

    /// Look up the scope selector registered for a syntax name.
    pub fn scope_for_syntax(&self, syntax: &str) -> Option<&str> {
        self.syntax_scopes
            .iter()
            .find(|(name, _)| name == syntax)
            .map(|(_, selector)| selector.as_str())
    }
}
