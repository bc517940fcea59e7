//! Single-slot override region state machine.
//!
//! At most one region is alive per controller: **Inactive** → **Active**
//! (one tracked span) → **Inactive**, with the departed bounds captured as a
//! single-shot "last region" hint consumed by the next classification that
//! tests it.
//!
//! Lifecycle rules:
//! * `activate` replaces any live region outright; the replaced region
//!   leaves no last-region record, and a pending hint is cleared.
//! * `check_deactivate` fires on cursor-position-change while active and
//!   deactivates once the cursor leaves the span. Because deactivation
//!   empties the slot, leaving a region produces exactly one transition
//!   until the next activation.
//! * `deactivate` is idempotent; a second call is a no-op and leaves the
//!   recorded hint untouched.
//!
//! Hosts wire their cursor-moved event source off `is_observing_cursor`:
//! subscribe when it turns true, unsubscribe when it turns false.

use crate::{REGION_ACTIVATIONS, REGION_AUTO_DEACTIVATIONS};
use std::sync::atomic::Ordering;
use tracing::debug;

/// Span of buffer text where automatic switching is suspended.
///
/// `start`/`end` are char offsets. Activation spans `[back_position,
/// cursor)`, but containment treats `end` as inclusive so the activating
/// cursor offset itself stays inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideRegion {
    pub start: usize,
    pub end: usize,
}

impl OverrideRegion {
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// Tracks the one live override region and the single-shot record of the
/// most recently departed one.
#[derive(Debug, Default)]
pub struct RegionController {
    active: Option<OverrideRegion>,
    last: Option<OverrideRegion>,
}

impl RegionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin suspending automatic switching over `[start, end]`.
    pub fn activate(&mut self, start: usize, end: usize) {
        if let Some(old) = self.active {
            debug!(
                target: "engine.region",
                old_start = old.start,
                old_end = old.end,
                "region_discarded"
            );
        }
        self.active = Some(OverrideRegion { start, end });
        self.last = None;
        REGION_ACTIVATIONS.fetch_add(1, Ordering::Relaxed);
        debug!(target: "engine.region", start, end, "region_activate");
    }

    /// Cursor-position-change hook. Deactivates when the cursor has left the
    /// live region; returns whether a deactivation fired.
    pub fn check_deactivate(&mut self, cursor: usize) -> bool {
        match self.active {
            Some(region) if !region.contains(cursor) => {
                REGION_AUTO_DEACTIVATIONS.fetch_add(1, Ordering::Relaxed);
                self.deactivate();
                true
            }
            _ => false,
        }
    }

    /// Clear the live region, recording its bounds as the single-shot last
    /// region. No-op when already inactive.
    pub fn deactivate(&mut self) {
        if let Some(region) = self.active.take() {
            debug!(
                target: "engine.region",
                start = region.start,
                end = region.end,
                "region_deactivate"
            );
            self.last = Some(region);
        }
    }

    /// Consume the last-region hint.
    pub fn take_last(&mut self) -> Option<OverrideRegion> {
        self.last.take()
    }

    /// True while a region is live. Host adapters subscribe and unsubscribe
    /// their cursor event feed on this flag.
    pub fn is_observing_cursor(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<OverrideRegion> {
        self.active
    }

    pub fn last(&self) -> Option<OverrideRegion> {
        self.last
    }
}
