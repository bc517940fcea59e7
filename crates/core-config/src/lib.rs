//! Configuration loading and per-buffer overrides.
//!
//! Parses `scriptshift.toml`: script patterns (`[patterns]`), the two input
//! source identifiers (`[sources]`), the external switch tool
//! (`[tool] path`), and optional per-buffer `[overrides.<name>]` tables that
//! replace any subset of those knobs for one buffer.
//!
//! A missing file and a file that fails to parse both fall back to defaults
//! (the parse failure logs a warning); unknown fields are ignored so the
//! format can grow without breaking older configs. Pattern strings are kept
//! raw here and compiled into a `PatternSet` at merge time, once per
//! effective (buffer-level) configuration.

use anyhow::Result;
use core_script::{
    DEFAULT_BLANK_PATTERN, DEFAULT_PRIMARY_PATTERN, DEFAULT_SECONDARY_PATTERN, PatternSet,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone)]
pub struct PatternsConfig {
    #[serde(default = "default_primary_pattern")]
    pub primary: String,
    #[serde(default = "default_secondary_pattern")]
    pub secondary: String,
    #[serde(default = "default_blank_pattern")]
    pub blank: String,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_pattern(),
            secondary: default_secondary_pattern(),
            blank: default_blank_pattern(),
        }
    }
}

fn default_primary_pattern() -> String {
    DEFAULT_PRIMARY_PATTERN.to_string()
}
fn default_secondary_pattern() -> String {
    DEFAULT_SECONDARY_PATTERN.to_string()
}
fn default_blank_pattern() -> String {
    DEFAULT_BLANK_PATTERN.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_primary_source")]
    pub primary: String,
    #[serde(default = "default_secondary_source")]
    pub secondary: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_source(),
            secondary: default_secondary_source(),
        }
    }
}

// im-select identifiers for a stock macOS setup; Linux/Windows hosts are
// expected to configure these explicitly.
fn default_primary_source() -> String {
    "com.apple.keylayout.ABC".to_string()
}
fn default_secondary_source() -> String {
    "com.apple.inputmethod.SCIM.ITABC".to_string()
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ToolConfig {
    /// Path or name of the external input-source tool. Absent means the
    /// switching feature is inert.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Per-buffer replacement values; every field optional.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct OverrideConfig {
    pub primary_pattern: Option<String>,
    pub secondary_pattern: Option<String>,
    pub blank_pattern: Option<String>,
    pub primary_source: Option<String>,
    pub secondary_source: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: a `scriptshift.toml` in the working directory
/// wins; otherwise the platform config dir, when one exists.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("scriptshift.toml");
    match dirs::config_dir() {
        Some(dir) if !local.exists() => dir.join("scriptshift").join("scriptshift.toml"),
        _ => local,
    }
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", file = %path.display(), "config_loaded");
                Ok(Config {
                    raw: Some(content),
                    file,
                })
            }
            Err(err) => {
                warn!(target: "config", file = %path.display(), %err, "config_parse_error_fallback");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

/// Settings after the per-buffer override merge, with patterns compiled.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub patterns: PatternSet,
    pub primary_source: String,
    pub secondary_source: String,
    pub tool: Option<PathBuf>,
}

impl Config {
    /// Resolve the effective configuration for `buffer` (or the base
    /// configuration when `None` / no override table matches). Pattern
    /// compilation failure surfaces as an error naming the broken matcher.
    pub fn effective(&self, buffer: Option<&str>) -> Result<EffectiveConfig> {
        let ov = buffer.and_then(|name| self.file.overrides.get(name));
        let pick = |field: Option<&String>, base: &String| -> String {
            field.unwrap_or(base).clone()
        };
        let (primary_pattern, secondary_pattern, blank_pattern, primary_source, secondary_source) =
            match ov {
                Some(o) => (
                    pick(o.primary_pattern.as_ref(), &self.file.patterns.primary),
                    pick(o.secondary_pattern.as_ref(), &self.file.patterns.secondary),
                    pick(o.blank_pattern.as_ref(), &self.file.patterns.blank),
                    pick(o.primary_source.as_ref(), &self.file.sources.primary),
                    pick(o.secondary_source.as_ref(), &self.file.sources.secondary),
                ),
                None => (
                    self.file.patterns.primary.clone(),
                    self.file.patterns.secondary.clone(),
                    self.file.patterns.blank.clone(),
                    self.file.sources.primary.clone(),
                    self.file.sources.secondary.clone(),
                ),
            };
        let patterns = PatternSet::compile(&primary_pattern, &secondary_pattern, &blank_pattern)?;
        Ok(EffectiveConfig {
            patterns,
            primary_source,
            secondary_source,
            tool: self.file.tool.path.clone(),
        })
    }
}
