//! Proximity scanning around the cursor.
//!
//! Pure read-only probing: find the nearest non-blank characters before and
//! after the cursor and classify them. Three passes over the neighborhood:
//!
//! 1. Backward on the cursor's line, skipping blanks, stopping at the line
//!    start. Yields `back_position` and `before` (the character just before
//!    that position).
//! 2. Continuing backward from `back_position`, now skipping newlines too.
//!    Yields `cross_line_before`.
//! 3. Forward on the cursor's line, skipping blanks, stopping at the line
//!    end. Yields `forward_position` and `after` (the character at that
//!    position).
//!
//! The scanner never mutates anything and is total over its inputs: empty
//! buffers, cursors at the text boundaries, and lines with no non-blank
//! neighbor all produce a well-formed `ScanResult` with `None` fields.

use core_script::{PatternSet, ScriptClass};
use core_text::TextAccess;
use tracing::trace;

/// Snapshot of the cursor's immediate neighborhood.
///
/// Produced fresh per query and never persisted. A `None` field means no
/// character exists in that direction; a character that exists but matches
/// neither configured pattern (a digit, punctuation, or a line terminator
/// reached by the bounded passes) is `Some(ScriptClass::Unknown)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    pub cross_line_before: Option<ScriptClass>,
    pub before: Option<ScriptClass>,
    pub back_position: usize,
    pub forward_position: usize,
    pub after: Option<ScriptClass>,
}

/// Probe the text around `cursor`. Offsets outside the buffer are clamped.
pub fn scan<T: TextAccess>(text: &T, cursor: usize, patterns: &PatternSet) -> ScanResult {
    let cursor = cursor.min(text.len_chars());
    let (line_start, line_end) = text.line_bounds(cursor);

    // Backward: blanks only, bounded by the line start.
    let mut back = cursor;
    while back > line_start {
        match text.char_at(back - 1) {
            Some(c) if patterns.is_blank(c) => back -= 1,
            _ => break,
        }
    }
    let before = class_before(text, back, patterns);

    // Extended backward: blanks and newlines, unbounded.
    let mut cross = back;
    while cross > 0 {
        match text.char_at(cross - 1) {
            Some(c) if c == '\n' || patterns.is_blank(c) => cross -= 1,
            _ => break,
        }
    }
    let cross_line_before = class_before(text, cross, patterns);

    // Forward: blanks only, bounded by the line end.
    let mut forward = cursor;
    while forward < line_end {
        match text.char_at(forward) {
            Some(c) if patterns.is_blank(c) => forward += 1,
            _ => break,
        }
    }
    let after = text.char_at(forward).map(|c| patterns.classify(Some(c)));

    let result = ScanResult {
        cross_line_before,
        before,
        back_position: back,
        forward_position: forward,
        after,
    };
    trace!(
        target: "engine.probe",
        cursor,
        line_start,
        line_end,
        back_position = result.back_position,
        forward_position = result.forward_position,
        before = ?result.before,
        after = ?result.after,
        cross_line_before = ?result.cross_line_before,
        "scan"
    );
    result
}

fn class_before<T: TextAccess>(
    text: &T,
    position: usize,
    patterns: &PatternSet,
) -> Option<ScriptClass> {
    if position == 0 {
        return None;
    }
    text.char_at(position - 1)
        .map(|c| patterns.classify(Some(c)))
}
