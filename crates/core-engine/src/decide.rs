//! Verdict to switch-command mapping.
//!
//! The decision rule only ever moves between the two configured sources and
//! suppresses redundant switches. An unrecognized current source (the user
//! picked some third input method by hand) is left untouched.

use core_script::ScriptClass;
use serde::Serialize;
use std::fmt;

/// Opaque keyboard input source identifier, e.g.
/// `com.apple.keylayout.ABC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InputSourceId(String);

impl InputSourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputSourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InputSourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What the engine asks the host to do with the input source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "source", rename_all = "kebab-case")]
pub enum SwitchCommand {
    NoOp,
    Activate(InputSourceId),
}

impl SwitchCommand {
    pub fn is_noop(&self) -> bool {
        matches!(self, SwitchCommand::NoOp)
    }
}

impl fmt::Display for SwitchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchCommand::NoOp => f.write_str("no-op"),
            SwitchCommand::Activate(id) => write!(f, "activate {id}"),
        }
    }
}

/// Map a verdict and the currently active source to a switch command.
///
/// `current` of `None` (the source cannot be determined) and a current
/// source equal to neither configured id both yield `NoOp`; nothing is ever
/// forced. `Unknown` verdicts are treated like no verdict.
pub fn decide_switch(
    verdict: Option<ScriptClass>,
    current: Option<&InputSourceId>,
    primary: &InputSourceId,
    secondary: &InputSourceId,
) -> SwitchCommand {
    let Some(current) = current else {
        return SwitchCommand::NoOp;
    };
    match verdict {
        Some(ScriptClass::Secondary) if current == primary => {
            SwitchCommand::Activate(secondary.clone())
        }
        Some(ScriptClass::Primary) if current == secondary => {
            SwitchCommand::Activate(primary.clone())
        }
        _ => SwitchCommand::NoOp,
    }
}
