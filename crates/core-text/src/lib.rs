//! Read-only text access for context probing.
//!
//! The host editor owns the real buffer; this crate defines the narrow read
//! surface the probing pipeline needs (`TextAccess`) plus a rope-backed
//! `Buffer` used by the CLI harness and tests. All offsets are char offsets
//! into the text. `ropey` indexes chars natively, so single-character lookups
//! and line bound queries stay O(log n) even on large buffers.

use anyhow::Result;
use ropey::Rope;

/// Read surface consumed by the scanner and the switch engine.
///
/// `line_bounds` returns `(line_start, line_end)` for the line containing
/// `offset`, both as char offsets. `line_end` excludes the line terminator:
/// it is the offset of the `'\n'` itself, or `len_chars()` on a final line
/// without one. Offsets past the end of the text resolve to the last line.
pub trait TextAccess {
    /// Character at `offset`, or `None` past the end of the text.
    fn char_at(&self, offset: usize) -> Option<char>;
    /// Bounds of the line containing `offset`.
    fn line_bounds(&self, offset: usize) -> (usize, usize);
    /// Total character count.
    fn len_chars(&self) -> usize;
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Construct a buffer by draining a reader (used for stdin input).
    pub fn from_reader(name: impl Into<String>, reader: impl std::io::Read) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_reader(reader)?,
            name: name.into(),
        })
    }

    /// Clamp an externally supplied offset into the valid cursor range
    /// `[0, len_chars()]`.
    pub fn clamp(&self, offset: usize) -> usize {
        offset.min(self.rope.len_chars())
    }
}

impl TextAccess for Buffer {
    fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    fn line_bounds(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line);
        let next = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1)
        } else {
            self.rope.len_chars()
        };
        // ropey lines include the trailing newline except possibly the last line.
        let end = if next > start && self.rope.char(next - 1) == '\n' {
            next - 1
        } else {
            next
        };
        (start, end)
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }
}
