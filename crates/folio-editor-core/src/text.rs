//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait is the seam to the buffer collaborator: it exposes
//! exactly what the decoration and command engines read (length, slices,
//! line boundaries) plus the mutation primitives used when an `EditResult`
//! is applied. `EditorRope` is the ropey-backed implementation.
//!
//! All offsets are byte offsets (UTF-8). Callers never pass offsets that
//! split a UTF-8 sequence; the syntax tree and selection both come from the
//! same buffer revision and respect character boundaries.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// A text buffer that supports slicing, line lookup, and efficient editing.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_bytes() == 0
    }

    /// Get a slice as SmolStr. Returns None if the range is out of bounds.
    ///
    /// A None here when fed a syntax-node span means the tree snapshot and
    /// the buffer are from different revisions - a caller bug, surfaced as
    /// an error by the decoration engine rather than tolerated.
    fn slice(&self, byte_range: Range<usize>) -> Option<SmolStr>;

    /// Get the character starting at a byte offset. None if out of bounds.
    fn char_at(&self, byte_offset: usize) -> Option<char>;

    /// Byte span of the line containing `byte_offset`, newline excluded.
    ///
    /// An offset at or past the end of the buffer resolves to the last line.
    fn line_range(&self, byte_offset: usize) -> Range<usize>;

    /// Insert text at byte offset.
    fn insert(&mut self, byte_offset: usize, text: &str);

    /// Delete byte range.
    fn delete(&mut self, byte_range: Range<usize>);

    /// Replace byte range with text.
    fn replace(&mut self, byte_range: Range<usize>, text: &str) {
        self.delete(byte_range.clone());
        self.insert(byte_range.start, text);
    }

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// Ropey-backed text buffer.
///
/// Provides O(log n) editing and byte/char/line conversions. The trait works
/// in bytes; the conversions to ropey's char indices live here.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn slice(&self, byte_range: Range<usize>) -> Option<SmolStr> {
        if byte_range.start > byte_range.end || byte_range.end > self.rope.len_bytes() {
            return None;
        }
        let start = self.rope.byte_to_char(byte_range.start);
        let end = self.rope.byte_to_char(byte_range.end);
        Some(self.rope.slice(start..end).to_smolstr())
    }

    fn char_at(&self, byte_offset: usize) -> Option<char> {
        if byte_offset >= self.rope.len_bytes() {
            return None;
        }
        Some(self.rope.char(self.rope.byte_to_char(byte_offset)))
    }

    fn line_range(&self, byte_offset: usize) -> Range<usize> {
        let offset = byte_offset.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(offset);
        let start = self.rope.line_to_byte(line);
        let end = if line + 1 < self.rope.len_lines() {
            // Next line start minus the newline itself.
            self.rope.line_to_byte(line + 1) - 1
        } else {
            self.rope.len_bytes()
        };
        start..end
    }

    fn insert(&mut self, byte_offset: usize, text: &str) {
        let at = self.rope.byte_to_char(byte_offset);
        self.rope.insert(at, text);
    }

    fn delete(&mut self, byte_range: Range<usize>) {
        let start = self.rope.byte_to_char(byte_range.start);
        let end = self.rope.byte_to_char(byte_range.end);
        self.rope.remove(start..end);
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
