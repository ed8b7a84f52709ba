//! Override document loading
//!
//! The store itself never touches the filesystem; the editor host may
//! supply override bytes from anywhere and feed them through
//! [`parse_document`]. This module provides the file-backed path used by
//! the CLI: explicit files fail hard, auto-discovered files soft-fail to
//! empty overrides with a warning.

use crate::domain::ConfigDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk format of an override document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Parse an override document into the canonical JSON-shaped form.
///
/// TOML and YAML are parsed to their generic value type first and then
/// converted, so every downstream consumer sees one representation. The
/// top level must be a mapping.
pub fn parse_document(content: &str, format: Format) -> Result<ConfigDocument> {
    let value: serde_json::Value = match format {
        Format::Json => serde_json::from_str(content).context("invalid JSON syntax")?,
        Format::Toml => {
            let raw: toml::Value = toml::from_str(content).context("invalid TOML syntax")?;
            serde_json::to_value(raw).context("TOML document does not map to settings values")?
        }
        Format::Yaml => {
            let raw: serde_yaml::Value =
                serde_yaml::from_str(content).context("invalid YAML syntax")?;
            serde_json::to_value(raw).context("YAML document does not map to settings values")?
        }
    };

    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(ConfigDocument::new()),
        other => anyhow::bail!(
            "settings document must be a mapping at the top level, got {}",
            crate::domain::shape_of(&other)
        ),
    }
}

/// Read and parse one override file.
pub fn load_file(path: &Path) -> Result<ConfigDocument> {
    let format = Format::from_path(path).with_context(|| {
        format!("unsupported settings extension for file {}", path.display())
    })?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading settings file: {}", path.display()))?;
    parse_document(&content, format)
        .with_context(|| format!("invalid settings file: {}", path.display()))
}

/// Load overrides from an explicit file or by discovery in a directory.
///
/// An explicitly named file that fails to read or parse is an error. A
/// discovered file that fails only produces a warning, and the load
/// degrades to empty overrides so the shipped defaults stay in effect.
pub fn load_overrides(search_dir: &Path, explicit: Option<&Path>) -> Result<ConfigDocument> {
    let explicit_provided = explicit.is_some();

    let discovered = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_overrides(search_dir),
    };

    let Some(file) = discovered else {
        return Ok(ConfigDocument::new());
    };

    match load_file(&file) {
        Ok(doc) => Ok(doc),
        Err(e) => {
            if explicit_provided {
                return Err(e);
            }
            tracing::warn!("ignoring discovered settings file {}: {:#}", file.display(), e);
            Ok(ConfigDocument::new())
        }
    }
}

/// Probe well-known override filenames in a directory.
pub fn discover_overrides(dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "abbr-settings.json",
        ".abbr-settings.json",
        "abbr-settings.toml",
        ".abbr-settings.toml",
        "abbr-settings.yaml",
        ".abbr-settings.yaml",
        "abbr-settings.yml",
        ".abbr-settings.yml",
    ];

    for candidate in candidates {
        let path = dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
