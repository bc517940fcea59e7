//! Language-context verdict for a cursor position.
//!
//! A fixed decision table over the scan result and the override-region
//! state. While the cursor sits inside the active override region no verdict
//! is produced at all; that is what the region suspends. Outside of that,
//! first match wins and the ordering is itself the policy; rules are
//! numbered in match order below. Rule 1 is the only rule with a side effect
//! (it activates an override region), and rule 2 consumes the single-shot
//! last-region hint the first time it is evaluated, whether or not it
//! matches.

use crate::region::RegionController;
use core_probe::ScanResult;
use core_script::ScriptClass;
use tracing::debug;

/// Decide the script context at `cursor`, or `None` when the neighborhood
/// supports no verdict (the caller then leaves the input source unchanged).
pub fn guess_context(
    scan: &ScanResult,
    regions: &mut RegionController,
    line_start: usize,
    line_end: usize,
    cursor: usize,
) -> Option<ScriptClass> {
    let verdict = apply_rules(scan, regions, line_start, line_end, cursor);
    debug!(
        target: "engine.verdict",
        cursor,
        verdict = ?verdict,
        observing = regions.is_observing_cursor(),
        "guess_context"
    );
    verdict
}

fn apply_rules(
    scan: &ScanResult,
    regions: &mut RegionController,
    line_start: usize,
    line_end: usize,
    cursor: usize,
) -> Option<ScriptClass> {
    let ScanResult {
        cross_line_before,
        before,
        back_position,
        forward_position,
        after,
    } = *scan;

    // Inside the active region automatic switching is suspended: no verdict.
    if let Some(active) = regions.active()
        && active.contains(cursor)
    {
        return None;
    }

    // Rule 1: a blank run was skipped on this line and a secondary-script
    // word sits just before it. The user finished that word and spaced off;
    // default to primary for what comes next and protect the skipped span.
    if back_position > line_start
        && back_position < cursor
        && before == Some(ScriptClass::Secondary)
    {
        regions.activate(back_position, cursor);
        return Some(ScriptClass::Primary);
    }

    // Rule 2: re-entry just after a region that auto-deactivated, landing
    // behind a primary-script character. Resume secondary input. The hint is
    // consumed here even when the rule does not match.
    if let Some(last) = regions.take_last()
        && last.contains(back_position)
        && back_position < cursor
        && before == Some(ScriptClass::Primary)
    {
        return Some(ScriptClass::Secondary);
    }

    // Rule 3: blank gap ahead of the cursor with secondary text beyond it.
    if forward_position > cursor
        && forward_position < line_end
        && after == Some(ScriptClass::Secondary)
    {
        return Some(ScriptClass::Primary);
    }

    // Rule 4: secondary text directly at the cursor.
    if forward_position == cursor && after == Some(ScriptClass::Secondary) {
        return Some(ScriptClass::Secondary);
    }

    // Rules 5 and 6: fall back to the nearest non-blank character across
    // line boundaries.
    match cross_line_before {
        Some(ScriptClass::Primary) => Some(ScriptClass::Primary),
        Some(ScriptClass::Secondary) => Some(ScriptClass::Secondary),
        // Rule 7: nothing decisive nearby.
        _ => None,
    }
}
