//! Single-character script classification.
//!
//! Every decision the switch engine makes bottoms out in classifying one
//! character as belonging to the primary script (e.g. Latin), the secondary
//! script (e.g. CJK), or neither. Classification is a single-character regex
//! test against a compiled `PatternSet`; the patterns are configuration, so a
//! buffer editing Japanese prose and a buffer editing Korean prose can carry
//! different sets.
//!
//! The primary and secondary patterns are assumed mutually exclusive. When a
//! character matches both anyway, primary wins; the tie-break is fixed so the
//! result stays deterministic under any configuration.

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptClass {
    Primary,
    Secondary,
    Unknown,
}

/// Pattern compilation failure, tagged with which matcher was broken.
#[derive(Debug, Error)]
#[error("invalid {role} pattern `{pattern}`: {source}")]
pub struct PatternError {
    pub role: &'static str,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

pub const DEFAULT_PRIMARY_PATTERN: &str = "[A-Za-z]";
pub const DEFAULT_SECONDARY_PATTERN: &str = r"[\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]";
/// Horizontal whitespace only. The scanner handles newlines itself, so the
/// blank matcher must never match `'\n'`.
pub const DEFAULT_BLANK_PATTERN: &str = "[ \t]";

/// Compiled character matchers for one editing context.
///
/// Immutable once compiled; per-buffer overrides produce a fresh set at
/// configuration merge time.
#[derive(Debug, Clone)]
pub struct PatternSet {
    primary: Regex,
    secondary: Regex,
    blank: Regex,
}

impl PatternSet {
    pub fn compile(primary: &str, secondary: &str, blank: &str) -> Result<Self, PatternError> {
        Ok(Self {
            primary: compile_one("primary", primary)?,
            secondary: compile_one("secondary", secondary)?,
            blank: compile_one("blank", blank)?,
        })
    }

    /// Classify a single character. `None` (no character present) is a
    /// legitimate input and classifies as `Unknown`, never an error.
    pub fn classify(&self, ch: Option<char>) -> ScriptClass {
        let Some(ch) = ch else {
            return ScriptClass::Unknown;
        };
        if self.matches(&self.primary, ch) {
            ScriptClass::Primary
        } else if self.matches(&self.secondary, ch) {
            ScriptClass::Secondary
        } else {
            ScriptClass::Unknown
        }
    }

    /// Whether `ch` is skippable horizontal blank.
    pub fn is_blank(&self, ch: char) -> bool {
        self.matches(&self.blank, ch)
    }

    fn matches(&self, re: &Regex, ch: char) -> bool {
        let mut buf = [0u8; 4];
        re.is_match(ch.encode_utf8(&mut buf))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::compile(
            DEFAULT_PRIMARY_PATTERN,
            DEFAULT_SECONDARY_PATTERN,
            DEFAULT_BLANK_PATTERN,
        )
        .expect("default patterns are valid")
    }
}

fn compile_one(role: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError {
        role,
        pattern: pattern.to_string(),
        source,
    })
}
