//! Scriptshift entrypoint: one-shot context decision over a file or stdin.
//!
//! The binary is the host adapter around the engine crates: it loads the
//! configuration, reads the buffer text, runs a single classification at the
//! given cursor offset, and prints the decision (optionally as JSON). With
//! `--apply` and a configured tool it also executes the switch the way an
//! editor integration would: the tool invoked with no arguments prints the
//! current source id, and invoked with one argument activates that source
//! (the `im-select` calling convention).

use anyhow::{Context as _, Result};
use clap::Parser;
use core_config::EffectiveConfig;
use core_engine::{
    BufferEvent, EngineSettings, InputSourceId, InputSourcePort, SwitchEngine, SwitchOutcome,
};
use core_text::{Buffer, TextAccess};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{fs, io};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "scriptshift", version, about = "Context-sensitive input source switching")]
struct Args {
    /// UTF-8 text file to probe; stdin when omitted.
    pub path: Option<PathBuf>,
    /// Cursor position as a char offset into the buffer.
    #[arg(long)]
    pub cursor: usize,
    /// Configuration file path (overrides discovery of `scriptshift.toml`).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Buffer name selecting an `[overrides.<name>]` table from the config.
    #[arg(long)]
    pub buffer: Option<String>,
    /// Current input source id; skips querying the external tool.
    #[arg(long)]
    pub current: Option<String>,
    /// Execute the configured tool instead of reporting a dry run.
    #[arg(long)]
    pub apply: bool,
    /// Emit the decision as JSON.
    #[arg(long)]
    pub json: bool,
    /// Directory for `scriptshift.log`; file logging disabled when absent.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(log_dir, "scriptshift.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => {
            // Global subscriber already installed; drop the guard so the
            // writer shuts down.
            None
        }
    }
}

/// Input-source access backed by an im-select-style external tool.
///
/// `--current` pins the answer to the query side; without `--apply` the
/// activation side degrades to a logged dry run. A missing tool leaves both
/// sides inert, which turns every decision into a no-op downstream.
struct HostPort {
    tool: Option<PathBuf>,
    fixed_current: Option<InputSourceId>,
    apply: bool,
}

impl HostPort {
    fn query_tool(&self) -> Option<InputSourceId> {
        let tool = self.tool.as_ref()?;
        let output = match Command::new(tool).output() {
            Ok(output) => output,
            Err(err) => {
                warn!(target: "switch", tool = %tool.display(), %err, "tool_query_failed");
                return None;
            }
        };
        if !output.status.success() {
            warn!(
                target: "switch",
                tool = %tool.display(),
                code = ?output.status.code(),
                "tool_query_nonzero"
            );
            return None;
        }
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return None;
        }
        Some(InputSourceId::new(id))
    }
}

impl InputSourcePort for HostPort {
    fn current(&mut self) -> Option<InputSourceId> {
        if let Some(id) = &self.fixed_current {
            return Some(id.clone());
        }
        self.query_tool()
    }

    fn activate(&mut self, id: &InputSourceId) {
        let Some(tool) = self.tool.as_ref().filter(|_| self.apply) else {
            info!(target: "switch", to = id.as_str(), "dry_run_switch");
            return;
        };
        // Fire and forget; failures are logged and swallowed.
        match Command::new(tool).arg(id.as_str()).status() {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(target: "switch", code = ?status.code(), "tool_exit_nonzero");
            }
            Err(err) => {
                warn!(target: "switch", tool = %tool.display(), %err, "tool_spawn_failed");
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct DecisionReport<'a> {
    buffer: &'a str,
    cursor: usize,
    outcome: &'a SwitchOutcome,
    observing_cursor: bool,
}

fn print_report(report: &DecisionReport<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let verdict = match report.outcome.verdict {
        Some(class) => format!("{class:?}").to_lowercase(),
        None => "none".to_string(),
    };
    println!("buffer: {}", report.buffer);
    println!("cursor: {}", report.cursor);
    println!("verdict: {verdict}");
    println!("command: {}", report.outcome.command);
    println!("observing-cursor: {}", report.observing_cursor);
    Ok(())
}

fn load_buffer(path: Option<&Path>) -> Result<Buffer> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "buffer".to_string());
            Ok(Buffer::from_str(name, &content))
        }
        None => Buffer::from_reader("stdin", io::stdin().lock()),
    }
}

fn build_engine(effective: EffectiveConfig, args: &Args) -> SwitchEngine {
    if effective.tool.is_none() && args.current.is_none() {
        warn!(target: "switch", "no_tool_or_current_source_feature_inert");
    }
    let port = HostPort {
        tool: effective.tool.clone(),
        fixed_current: args.current.as_deref().map(InputSourceId::new),
        apply: args.apply,
    };
    let settings = EngineSettings::new(
        effective.patterns,
        effective.primary_source,
        effective.secondary_source,
    );
    SwitchEngine::new(settings, Box::new(port))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = args.log_dir.as_deref().and_then(init_logging);

    let config = core_config::load_from(args.config.clone())?;
    let effective = config.effective(args.buffer.as_deref())?;
    let buffer = load_buffer(args.path.as_deref())?;

    let cursor = buffer.clamp(args.cursor);
    if cursor != args.cursor {
        warn!(
            target: "io",
            requested = args.cursor,
            clamped = cursor,
            len = buffer.len_chars(),
            "cursor_clamped"
        );
    }
    info!(
        target: "io",
        buffer = %buffer.name,
        len_chars = buffer.len_chars(),
        cursor,
        "buffer_loaded"
    );

    let mut engine = build_engine(effective, &args);
    let outcome = engine.handle(&buffer, BufferEvent::Edited { cursor });
    let report = DecisionReport {
        buffer: &buffer.name,
        cursor,
        outcome: &outcome,
        observing_cursor: engine.is_observing_cursor(),
    };
    print_report(&report, args.json)
}
