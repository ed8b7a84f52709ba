//! Settings resolution: merge, validation and snapshot store
//!
//! Overrides are merged per key against the shipped defaults. A bad value
//! never aborts the load: the key falls back to its default, the problem
//! is recorded in the [`MergeReport`] and logged as a warning. Keys the
//! schema does not know pass through verbatim.

use crate::domain::{shape_of, ConfigDocument, Settings, ValueKind};
use crate::schema::{self, OptionDef};
use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::Arc;

/// A single rejected override value.
///
/// Recovered locally: the offending key keeps its default while the rest
/// of the document resolves normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected {expected} for `{key}`, got {found}")]
    TypeMismatch { key: String, expected: ValueKind, found: &'static str },

    #[error("value {value} for `{key}` is out of range ({min}..={max})")]
    OutOfRange { key: String, value: i64, min: i64, max: i64 },

    #[error("`{value}` is not a valid choice for `{key}` (allowed: {allowed})")]
    InvalidChoice { key: String, value: String, allowed: String },
}

impl ValidationError {
    /// The settings key the error applies to.
    pub fn key(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { key, .. }
            | ValidationError::OutOfRange { key, .. }
            | ValidationError::InvalidChoice { key, .. } => key,
        }
    }
}

/// Failure to answer a typed lookup.
///
/// Unlike [`ValidationError`] this is a programming error in the consumer
/// and is surfaced, never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown settings key `{key}`")]
    UnknownKey { key: String },

    #[error("settings key `{key}` holds {found}, not {expected}")]
    WrongType { key: String, expected: ValueKind, found: &'static str },
}

/// Outcome of a merge: per-key problems and passthrough keys.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Override values rejected by the schema, in document order.
    pub issues: Vec<ValidationError>,
    /// Override keys the schema does not know, passed through verbatim.
    pub unknown_keys: Vec<String>,
}

impl MergeReport {
    /// True when every override value was accepted.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check one override value against its option definition.
pub fn validate(def: &OptionDef, value: &Value) -> Result<(), ValidationError> {
    if !def.kind.matches(value) {
        return Err(ValidationError::TypeMismatch {
            key: def.name.to_string(),
            expected: def.kind,
            found: shape_of(value),
        });
    }

    if def.kind == ValueKind::Int {
        if let Some(n) = value.as_i64() {
            let min = def.min.unwrap_or(i64::MIN);
            let max = def.max.unwrap_or(i64::MAX);
            if n < min || n > max {
                return Err(ValidationError::OutOfRange {
                    key: def.name.to_string(),
                    value: n,
                    min,
                    max,
                });
            }
        }
    }

    if let (Some(allowed), Some(s)) = (def.choices, value.as_str()) {
        if !allowed.contains(&s) {
            return Err(ValidationError::InvalidChoice {
                key: def.name.to_string(),
                value: s.to_string(),
                allowed: allowed.join(", "),
            });
        }
    }

    Ok(())
}

/// An immutable resolved configuration.
///
/// Holds every default key (possibly overridden) plus any passthrough
/// keys. Shared read-only between consumers; a reload produces a new
/// `Config` rather than mutating this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: ConfigDocument,
}

impl Default for Config {
    fn default() -> Self {
        Config::resolve(schema::defaults(), None).0
    }
}

impl Config {
    /// Merge one optional override document over the defaults.
    pub fn resolve(
        defaults: &ConfigDocument,
        overrides: Option<&ConfigDocument>,
    ) -> (Config, MergeReport) {
        match overrides {
            Some(doc) => Config::resolve_layers(defaults, &[doc]),
            None => Config::resolve_layers(defaults, &[]),
        }
    }

    /// Merge override layers over the defaults, later layers winning
    /// (pass user-level overrides before workspace-level ones).
    pub fn resolve_layers(
        defaults: &ConfigDocument,
        layers: &[&ConfigDocument],
    ) -> (Config, MergeReport) {
        let mut values = defaults.clone();
        let mut report = MergeReport::default();

        for layer in layers {
            for (key, value) in layer.iter() {
                match schema::find(key) {
                    Some(def) => match validate(def, value) {
                        Ok(()) => {
                            values.insert(key.clone(), value.clone());
                        }
                        Err(issue) => {
                            tracing::warn!("ignoring override for `{}`: {}", key, issue);
                            report.issues.push(issue);
                        }
                    },
                    None => {
                        // Forward-compatibility: keep keys this build does
                        // not know about.
                        if !report.unknown_keys.iter().any(|k| k == key) {
                            report.unknown_keys.push(key.clone());
                        }
                        values.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        tracing::debug!(
            keys = values.len(),
            rejected = report.issues.len(),
            passthrough = report.unknown_keys.len(),
            "settings resolved"
        );
        (Config { values }, report)
    }

    /// The resolved document, defaults first in schema order, then
    /// passthrough keys in override order.
    pub fn document(&self) -> &ConfigDocument {
        &self.values
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Result<&Value, LookupError> {
        self.values.get(key).ok_or_else(|| LookupError::UnknownKey { key: key.to_string() })
    }

    /// Typed lookup of a boolean option.
    pub fn bool_value(&self, key: &str) -> Result<bool, LookupError> {
        let value = self.get(key)?;
        value.as_bool().ok_or_else(|| wrong_type(key, ValueKind::Bool, value))
    }

    /// Typed lookup of an integer option.
    pub fn int_value(&self, key: &str) -> Result<i64, LookupError> {
        let value = self.get(key)?;
        value.as_i64().ok_or_else(|| wrong_type(key, ValueKind::Int, value))
    }

    /// Typed lookup of a string option.
    pub fn str_value(&self, key: &str) -> Result<&str, LookupError> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| wrong_type(key, ValueKind::Str, value))
    }

    /// Typed lookup of a string-list option.
    pub fn str_list(&self, key: &str) -> Result<Vec<String>, LookupError> {
        let value = self.get(key)?;
        let items = value.as_array().ok_or_else(|| wrong_type(key, ValueKind::StrList, value))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(key, ValueKind::StrList, item))
            })
            .collect()
    }

    /// Typed lookup of a mapping option.
    pub fn map_value(&self, key: &str) -> Result<&ConfigDocument, LookupError> {
        let value = self.get(key)?;
        value.as_object().ok_or_else(|| wrong_type(key, ValueKind::Map, value))
    }

    /// Build the typed view the expansion engine consumes.
    pub fn settings(&self) -> Settings {
        Settings {
            auto_mark: self.bool_or("auto_mark", true),
            abbreviation_preview: self.bool_or("abbreviation_preview", true),
            marker_scope: self.str_or("marker_scope", "region.accent"),
            syntax_scopes: self
                .map_value("syntax_scopes")
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect()
                })
                .unwrap_or_default(),
            inline_scopes: self.str_list("inline_scopes").unwrap_or_default(),
            abbreviation_scopes: self.str_list("abbreviation_scopes").unwrap_or_default(),
            ignore_scopes: self.str_list("ignore_scopes").unwrap_or_default(),
            tab_expand: self.bool_or("tab_expand", false),
            tag_preview: self.bool_or("tag_preview", false),
            context_size_limit: self.int_or("context_size_limit", 1_500_000),
            wrap_size_preview: self.int_or("wrap_size_preview", 10_240),
            comment: self.bool_or("comment", false),
            comment_scopes: self.str_list("comment_scopes").unwrap_or_default(),
            max_data_url: self.int_or("max_data_url", 20_480),
            engine_config: self.values.get("config").cloned().unwrap_or_else(|| Value::Object(Default::default())),
        }
    }

    fn bool_or(&self, key: &str, fallback: bool) -> bool {
        self.bool_value(key).unwrap_or(fallback)
    }

    fn int_or(&self, key: &str, fallback: i64) -> i64 {
        self.int_value(key).unwrap_or(fallback)
    }

    fn str_or(&self, key: &str, fallback: &str) -> String {
        self.str_value(key).unwrap_or(fallback).to_string()
    }
}

fn wrong_type(key: &str, expected: ValueKind, value: &Value) -> LookupError {
    LookupError::WrongType { key: key.to_string(), expected, found: shape_of(value) }
}

/// Owns the current resolved configuration and swaps it atomically on
/// reload. Readers hold `Arc<Config>` snapshots and never observe a
/// half-merged state.
pub struct ConfigStore {
    defaults: ConfigDocument,
    current: ArcSwap<Config>,
}

impl ConfigStore {
    /// Build a store over the given defaults, merging initial overrides.
    pub fn load(
        defaults: ConfigDocument,
        overrides: Option<&ConfigDocument>,
    ) -> (ConfigStore, MergeReport) {
        let (config, report) = Config::resolve(&defaults, overrides);
        let store = ConfigStore { defaults, current: ArcSwap::from_pointee(config) };
        (store, report)
    }

    /// Build a store over the shipped defaults.
    pub fn shipped(overrides: Option<&ConfigDocument>) -> (ConfigStore, MergeReport) {
        ConfigStore::load(schema::defaults().clone(), overrides)
    }

    /// The current configuration snapshot.
    pub fn snapshot(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Re-run the merge with new overrides and publish the result.
    ///
    /// Idempotent: reloading the same override document yields an
    /// identical resolved configuration.
    pub fn reload(&self, overrides: Option<&ConfigDocument>) -> MergeReport {
        let (config, report) = Config::resolve(&self.defaults, overrides);
        self.current.store(Arc::new(config));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> ConfigDocument {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_identity_merge_returns_defaults_unchanged() {
        let (config, report) = Config::resolve(schema::defaults(), Some(&ConfigDocument::new()));
        assert!(report.is_clean());
        assert!(report.unknown_keys.is_empty());
        assert_eq!(config.document(), schema::defaults());
    }

    #[test]
    fn test_valid_override_wins() {
        let overrides = doc(&[("max_data_url", json!(0)), ("tab_expand", json!(true))]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(report.is_clean());
        assert_eq!(config.int_value("max_data_url").expect("int"), 0);
        assert!(config.bool_value("tab_expand").expect("bool"));
        // Untouched keys keep their defaults.
        assert!(config.bool_value("auto_mark").expect("bool"));
    }

    #[test]
    fn test_invalid_override_falls_back_to_default() {
        let overrides = doc(&[("comment", json!("yes"))]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].key(), "comment");
        assert!(matches!(report.issues[0], ValidationError::TypeMismatch { .. }));
        assert!(!config.bool_value("comment").expect("bool"));
    }

    #[test]
    fn test_one_bad_key_does_not_invalidate_the_rest() {
        let overrides = doc(&[
            ("auto_mark", json!("definitely")),
            ("max_data_url", json!(0)),
            ("marker_scope", json!("region.bluish")),
        ]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].key(), "auto_mark");
        assert!(config.bool_value("auto_mark").expect("bool"), "falls back to default");
        assert_eq!(config.int_value("max_data_url").expect("int"), 0);
        assert_eq!(config.str_value("marker_scope").expect("str"), "region.bluish");
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let overrides = doc(&[("context_size_limit", json!(-1))]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(matches!(report.issues[0], ValidationError::OutOfRange { .. }));
        assert_eq!(config.int_value("context_size_limit").expect("int"), 1_500_000);
    }

    #[test]
    fn test_float_is_not_an_integer() {
        let overrides = doc(&[("max_data_url", json!(2.5))]);
        let (_, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(matches!(report.issues[0], ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_mixed_type_scope_list_is_rejected() {
        let overrides = doc(&[("ignore_scopes", json!(["comment", 3]))]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert_eq!(report.issues.len(), 1);
        let defaults_list = Config::default().str_list("ignore_scopes").expect("list");
        assert_eq!(config.str_list("ignore_scopes").expect("list"), defaults_list);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let overrides = doc(&[("attribute_quotes", json!("single"))]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(report.is_clean());
        assert_eq!(report.unknown_keys, vec!["attribute_quotes".to_string()]);
        assert_eq!(config.str_value("attribute_quotes").expect("str"), "single");
    }

    #[test]
    fn test_engine_config_shape_is_not_validated() {
        let overrides = doc(&[(
            "config",
            json!({"markup.attributes": {"class": "cls"}, "output.indent": 4}),
        )]);
        let (config, report) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(report.is_clean());
        let engine = config.map_value("config").expect("map");
        assert_eq!(engine["output.indent"], json!(4));
    }

    #[test]
    fn test_lookup_unknown_key_is_an_error() {
        let config = Config::default();
        assert_eq!(
            config.get("no_such_key"),
            Err(LookupError::UnknownKey { key: "no_such_key".to_string() })
        );
    }

    #[test]
    fn test_typed_lookup_on_wrong_shape() {
        let overrides = doc(&[("later_feature", json!(["a", "b"]))]);
        let (config, _) = Config::resolve(schema::defaults(), Some(&overrides));
        assert!(matches!(
            config.bool_value("later_feature"),
            Err(LookupError::WrongType { .. })
        ));
    }

    #[test]
    fn test_layer_precedence_workspace_wins() {
        let user = doc(&[("tab_expand", json!(true)), ("max_data_url", json!(0))]);
        let workspace = doc(&[("max_data_url", json!(4096))]);
        let (config, report) = Config::resolve_layers(schema::defaults(), &[&user, &workspace]);
        assert!(report.is_clean());
        assert!(config.bool_value("tab_expand").expect("bool"));
        assert_eq!(config.int_value("max_data_url").expect("int"), 4096);
    }

    #[test]
    fn test_invalid_workspace_value_keeps_user_value() {
        let user = doc(&[("wrap_size_preview", json!(2048))]);
        let workspace = doc(&[("wrap_size_preview", json!("big"))]);
        let (config, report) = Config::resolve_layers(schema::defaults(), &[&user, &workspace]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(config.int_value("wrap_size_preview").expect("int"), 2048);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let overrides = doc(&[("marker_scope", json!("region.purplish"))]);
        let (store, _) = ConfigStore::shipped(Some(&overrides));
        let first = store.snapshot();
        store.reload(Some(&overrides));
        let second = store.snapshot();
        assert_eq!(first.document(), second.document());
        let a = serde_json::to_string(first.document()).expect("serialize");
        let b = serde_json::to_string(second.document()).expect("serialize");
        assert_eq!(a, b);
    }

    #[test]
    fn test_reload_replaces_snapshot_without_touching_old_readers() {
        let (store, _) = ConfigStore::shipped(None);
        let before = store.snapshot();
        let overrides = doc(&[("auto_mark", json!(false))]);
        store.reload(Some(&overrides));
        assert!(before.bool_value("auto_mark").expect("bool"), "old snapshot unchanged");
        assert!(!store.snapshot().bool_value("auto_mark").expect("bool"));
    }

    #[test]
    fn test_choice_constraint() {
        let def = OptionDef {
            name: "quote_style",
            kind: ValueKind::Str,
            min: None,
            max: None,
            choices: Some(&["single", "double"]),
            default: || json!("double"),
            description: "",
        };
        assert!(validate(&def, &json!("single")).is_ok());
        let err = validate(&def, &json!("smart")).expect_err("rejected");
        assert!(matches!(err, ValidationError::InvalidChoice { .. }));
    }

    #[test]
    fn test_settings_view_reflects_overrides() {
        let overrides = doc(&[
            ("auto_mark", json!(false)),
            ("context_size_limit", json!(0)),
            ("syntax_scopes", json!({"vue": "text.html.vue"})),
        ]);
        let (config, _) = Config::resolve(schema::defaults(), Some(&overrides));
        let settings = config.settings();
        assert!(!settings.auto_mark);
        assert!(!settings.preview_enabled());
        assert_eq!(settings.context_size_limit, 0);
        assert_eq!(settings.scope_for_syntax("vue"), Some("text.html.vue"));
    }
}
