//! Context-sensitive input-source switching engine.
//!
//! One `SwitchEngine` instance serves one editing buffer and runs the whole
//! pipeline synchronously on that buffer's event thread: a discrete event
//! (text inserted, cursor moved, override dismissed) triggers a proximity
//! scan, the scan feeds the context decision table, and the verdict is
//! compared against the currently active source to emit at most one switch
//! command through the injected `InputSourcePort`.
//!
//! State is scoped per engine instance. There is no cross-buffer sharing and
//! no locking; the only process-wide items are the relaxed telemetry
//! counters below.
//!
//! Capability boundaries:
//! * `InputSourcePort` is resolved once by the host at construction time.
//!   The engine never probes the environment; an unavailable port is modeled
//!   by `InertPort`, which turns the whole feature into a no-op rather than
//!   an error.
//! * `ModalStateProbe` is optional. When present and reporting a structured
//!   (normal-mode) editing state, the engine forces primary input and skips
//!   classification entirely.
//! * Cursor observation is the host's job: deliver `CursorMoved` events
//!   while `is_observing_cursor()` is true, wiring and unwiring the event
//!   source as the flag changes.

pub mod context;
pub mod decide;
pub mod region;

pub use context::guess_context;
pub use decide::{InputSourceId, SwitchCommand, decide_switch};
pub use region::{OverrideRegion, RegionController};

use core_script::{PatternSet, ScriptClass};
use core_text::TextAccess;
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tracing::info;

// Telemetry counters (relaxed fetch_add, no locking). Inspected in tests and
// suitable for periodic structured logging by hosts.
pub static REGION_ACTIVATIONS: AtomicU64 = AtomicU64::new(0);
pub static REGION_AUTO_DEACTIVATIONS: AtomicU64 = AtomicU64::new(0);
pub static SWITCHES_ISSUED: AtomicU64 = AtomicU64::new(0);
pub static SWITCHES_SUPPRESSED: AtomicU64 = AtomicU64::new(0); // verdict produced, decision was NoOp

/// Access to the host's input-method state. Implementations wrap whatever
/// getter/setter pair the platform offers (a native API, an external tool).
pub trait InputSourcePort {
    /// Currently active source, or `None` when it cannot be determined.
    fn current(&mut self) -> Option<InputSourceId>;
    /// Best-effort activation. Failures stay inside the port; the next
    /// classification cycle re-evaluates from observed state.
    fn activate(&mut self, id: &InputSourceId);
}

/// Fallback port for hosts with no resolvable source tooling. Every decision
/// collapses to `NoOp`.
#[derive(Debug, Default)]
pub struct InertPort;

impl InputSourcePort for InertPort {
    fn current(&mut self) -> Option<InputSourceId> {
        None
    }

    fn activate(&mut self, _id: &InputSourceId) {}
}

/// Structured-editing (modal) state probe. A host with a modal editing layer
/// reports whether it currently sits in its normal mode.
pub trait ModalStateProbe {
    fn in_normal_mode(&self) -> bool;
}

/// Discrete editing events driving the pipeline. Each carries the cursor
/// offset as of the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    /// Text was inserted; the cursor sits after the inserted text.
    Edited { cursor: usize },
    /// The cursor moved without an edit. Hosts only need to deliver these
    /// while `is_observing_cursor()` is true.
    CursorMoved { cursor: usize },
    /// Explicit override dismissal (e.g. an acknowledgement keypress).
    Dismissed { cursor: usize },
}

impl BufferEvent {
    pub fn cursor(&self) -> usize {
        match *self {
            BufferEvent::Edited { cursor }
            | BufferEvent::CursorMoved { cursor }
            | BufferEvent::Dismissed { cursor } => cursor,
        }
    }
}

/// Effective per-buffer settings: compiled patterns plus the two source ids
/// the engine is allowed to switch between.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub patterns: PatternSet,
    pub primary_source: InputSourceId,
    pub secondary_source: InputSourceId,
}

impl EngineSettings {
    pub fn new(
        patterns: PatternSet,
        primary_source: impl Into<InputSourceId>,
        secondary_source: impl Into<InputSourceId>,
    ) -> Self {
        Self {
            patterns,
            primary_source: primary_source.into(),
            secondary_source: secondary_source.into(),
        }
    }
}

/// What a single event produced: the verdict, if any, and the command the
/// engine handed to the port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchOutcome {
    pub verdict: Option<ScriptClass>,
    pub command: SwitchCommand,
}

/// Per-buffer switching session.
pub struct SwitchEngine {
    settings: EngineSettings,
    regions: RegionController,
    port: Box<dyn InputSourcePort>,
    modal: Option<Box<dyn ModalStateProbe>>,
}

impl SwitchEngine {
    pub fn new(settings: EngineSettings, port: Box<dyn InputSourcePort>) -> Self {
        Self {
            settings,
            regions: RegionController::new(),
            port,
            modal: None,
        }
    }

    pub fn with_modal_probe(mut self, probe: Box<dyn ModalStateProbe>) -> Self {
        self.modal = Some(probe);
        self
    }

    /// Handle one editing event end to end.
    pub fn handle<T: TextAccess>(&mut self, text: &T, event: BufferEvent) -> SwitchOutcome {
        if let Some(modal) = &self.modal
            && modal.in_normal_mode()
        {
            return self.force_primary();
        }
        let cursor = event.cursor().min(text.len_chars());
        match event {
            BufferEvent::Dismissed { .. } => self.regions.deactivate(),
            _ => {
                self.regions.check_deactivate(cursor);
            }
        }
        let verdict = self.classify_at(text, cursor);
        self.issue(verdict)
    }

    /// Scan and classify without touching the port. Still runs rule side
    /// effects (region activation, hint consumption).
    pub fn classify_at<T: TextAccess>(&mut self, text: &T, cursor: usize) -> Option<ScriptClass> {
        let cursor = cursor.min(text.len_chars());
        let (line_start, line_end) = text.line_bounds(cursor);
        let probe = core_probe::scan(text, cursor, &self.settings.patterns);
        guess_context(&probe, &mut self.regions, line_start, line_end, cursor)
    }

    /// Bypass classification with a fixed primary verdict (mode
    /// transitions).
    pub fn force_primary(&mut self) -> SwitchOutcome {
        self.issue(Some(ScriptClass::Primary))
    }

    /// Bypass classification with a fixed secondary verdict.
    pub fn force_secondary(&mut self) -> SwitchOutcome {
        self.issue(Some(ScriptClass::Secondary))
    }

    pub fn is_observing_cursor(&self) -> bool {
        self.regions.is_observing_cursor()
    }

    pub fn regions(&self) -> &RegionController {
        &self.regions
    }

    fn issue(&mut self, verdict: Option<ScriptClass>) -> SwitchOutcome {
        let current = self.port.current();
        let command = decide_switch(
            verdict,
            current.as_ref(),
            &self.settings.primary_source,
            &self.settings.secondary_source,
        );
        match &command {
            SwitchCommand::Activate(id) => {
                SWITCHES_ISSUED.fetch_add(1, Ordering::Relaxed);
                info!(
                    target: "switch",
                    from = current.as_ref().map(InputSourceId::as_str),
                    to = id.as_str(),
                    "switch_source"
                );
                self.port.activate(id);
            }
            SwitchCommand::NoOp => {
                if verdict.is_some() {
                    SWITCHES_SUPPRESSED.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        SwitchOutcome { verdict, command }
    }
}
