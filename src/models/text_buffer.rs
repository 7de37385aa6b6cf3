//! Text buffer model.
//!
//! Responsibilities:
//! - text storage (Rope)
//! - (line, column) -> absolute byte offset mapping in the convention the
//!   completion daemon addresses source with

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

/// Borrow the slice as a str when it is contiguous, copy otherwise.
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn line(&self, line: usize) -> RopeSlice<'_> {
        self.rope.line(line)
    }

    /// Byte length of a line, excluding its terminator.
    pub fn line_len_bytes(&self, line: usize) -> usize {
        line_len_bytes(self.rope.line(line))
    }

    /// Absolute byte offset of a (line, column) cursor position.
    ///
    /// The daemon addresses source as the sum of the byte lengths of all
    /// lines before the cursor line, *excluding* line terminators, plus the
    /// column measured in bytes. `\n` and `\r\n` both count as zero bytes
    /// here. Lines past the end of the buffer contribute nothing, so any
    /// non-negative position yields an offset.
    pub fn byte_offset(&self, line: usize, column: usize) -> usize {
        let mut offset = column;
        for l in self.rope.lines().take(line) {
            offset += line_len_bytes(l);
        }
        offset
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn line_len_bytes(line: RopeSlice<'_>) -> usize {
    let mut len = line.len_bytes();
    let mut chars = line.len_chars();
    if chars > 0 && line.char(chars - 1) == '\n' {
        len -= 1;
        chars -= 1;
        if chars > 0 && line.char(chars - 1) == '\r' {
            len -= 1;
        }
    }
    len
}
