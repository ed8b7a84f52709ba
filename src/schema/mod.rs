//! Option schema for the abbreviation expander settings
//!
//! Every recognized option is described by an [`OptionDef`]: its expected
//! value kind, optional constraints, default value and a one-line
//! description. The shipped defaults document is derived from this table,
//! so a defaults key without a schema entry cannot exist.

use crate::domain::{ConfigDocument, ValueKind};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Definition of a recognized option.
pub struct OptionDef {
    /// Option name as it appears in settings documents.
    pub name: &'static str,
    /// Expected value kind.
    pub kind: ValueKind,
    /// Inclusive lower bound for integer options.
    pub min: Option<i64>,
    /// Inclusive upper bound for integer options.
    pub max: Option<i64>,
    /// Allowed values for enumerated string options.
    pub choices: Option<&'static [&'static str]>,
    /// Default value.
    pub default: fn() -> Value,
    /// Short description.
    pub description: &'static str,
}

impl std::fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .finish()
    }
}

/// All recognized options.
pub static OPTIONS: &[OptionDef] = &[
    OptionDef {
        name: "auto_mark",
        kind: ValueKind::Bool,
        min: None,
        max: None,
        choices: None,
        default: || json!(true),
        description: "Highlight abbreviations while typing",
    },
    OptionDef {
        name: "abbreviation_preview",
        kind: ValueKind::Bool,
        min: None,
        max: None,
        choices: None,
        default: || json!(true),
        description: "Show expansion preview for the captured abbreviation; requires auto_mark",
    },
    OptionDef {
        name: "marker_scope",
        kind: ValueKind::Str,
        min: None,
        max: None,
        choices: None,
        default: || json!("region.accent"),
        description: "Color scheme scope used to highlight a captured abbreviation",
    },
    OptionDef {
        name: "syntax_scopes",
        kind: ValueKind::StrMap,
        min: None,
        max: None,
        choices: None,
        default: || {
            json!({
                "html": "text.html - (source | text.html.markdown)",
                "xml": "text.xml",
                "xsl": "text.xml.xsl",
                "jsx": "source.js.jsx | source.jsx | source.tsx",
                "haml": "text.haml",
                "pug": "text.pug | text.jade",
                "slim": "text.slim",
                "css": "source.css - source.css.less - source.css.scss",
                "scss": "source.css.scss",
                "less": "source.css.less",
                "stylus": "source.stylus",
            })
        },
        description: "Syntax name to scope selector, defines where each output syntax applies",
    },
    OptionDef {
        name: "inline_scopes",
        kind: ValueKind::StrList,
        min: None,
        max: None,
        choices: None,
        default: || {
            json!([
                "text.html meta.attribute-with-value.style string.quoted",
                "source.css meta.property-value",
            ])
        },
        description: "Scope selectors treated as inline stylesheet context",
    },
    OptionDef {
        name: "abbreviation_scopes",
        kind: ValueKind::StrList,
        min: None,
        max: None,
        choices: None,
        default: || {
            json!([
                "text.html",
                "text.xml",
                "text.haml",
                "text.pug",
                "text.slim",
                "source.css",
                "source.stylus",
                "source.js.jsx",
                "source.jsx",
                "source.tsx",
            ])
        },
        description: "Scope selectors where abbreviation marking activates",
    },
    OptionDef {
        name: "ignore_scopes",
        kind: ValueKind::StrList,
        min: None,
        max: None,
        choices: None,
        default: || json!(["comment", "string.quoted - meta.attribute-with-value"]),
        description: "Scope selectors that suppress abbreviation capture",
    },
    OptionDef {
        name: "tab_expand",
        kind: ValueKind::Bool,
        min: None,
        max: None,
        choices: None,
        default: || json!(false),
        description: "Expand the captured abbreviation with the Tab key",
    },
    OptionDef {
        name: "tag_preview",
        kind: ValueKind::Bool,
        min: None,
        max: None,
        choices: None,
        default: || json!(false),
        description: "Show the open tag near its matching close tag when the open tag is off-screen",
    },
    OptionDef {
        name: "context_size_limit",
        kind: ValueKind::Int,
        min: Some(0),
        max: None,
        choices: None,
        default: || json!(1_500_000),
        description: "Max document size in bytes scanned for tag context; 0 disables context capture",
    },
    OptionDef {
        name: "wrap_size_preview",
        kind: ValueKind::Int,
        min: Some(0),
        max: None,
        choices: None,
        default: || json!(10_240),
        description: "Max selection size in bytes for instant wrap-with-abbreviation preview",
    },
    OptionDef {
        name: "comment",
        kind: ValueKind::Bool,
        min: None,
        max: None,
        choices: None,
        default: || json!(false),
        description: "Tag-aware toggle-comment behavior",
    },
    OptionDef {
        name: "comment_scopes",
        kind: ValueKind::StrList,
        min: None,
        max: None,
        choices: None,
        default: || json!(["text.html", "source.css"]),
        description: "Scope selectors where tag-aware commenting applies",
    },
    OptionDef {
        name: "max_data_url",
        kind: ValueKind::Int,
        min: Some(0),
        max: None,
        choices: None,
        default: || json!(20_480),
        description: "Max file size in bytes to inline as a data URL; 0 disables inlining",
    },
    OptionDef {
        name: "config",
        kind: ValueKind::Map,
        min: None,
        max: None,
        choices: None,
        default: || json!({}),
        description: "Options forwarded verbatim to the expansion engine, shape not validated",
    },
];

/// Find an option definition by name.
pub fn find(name: &str) -> Option<&'static OptionDef> {
    OPTIONS.iter().find(|o| o.name == name)
}

/// The shipped defaults document, derived from [`OPTIONS`].
pub fn defaults() -> &'static ConfigDocument {
    static DEFAULTS: Lazy<ConfigDocument> = Lazy::new(|| {
        OPTIONS.iter().map(|o| (o.name.to_string(), (o.default)())).collect()
    });
    &DEFAULTS
}
