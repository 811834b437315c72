//! Text navigation and analysis helpers.
//!
//! Line and word boundary reasoning shared by the command engine and the
//! active-line computation. Everything works on byte offsets over any
//! `TextBuffer`.

use std::ops::Range;

use crate::text::TextBuffer;

/// Find start of line containing offset.
pub fn find_line_start<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    buf.line_range(offset).start
}

/// Find end of line containing offset (position of newline or end of buffer).
pub fn find_line_end<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    buf.line_range(offset).end
}

/// Find the word under the caret, if the caret is strictly inside one.
///
/// Scans left and right from `offset` over contiguous non-whitespace
/// characters, staying within the containing line. Returns None unless the
/// scan can move in both directions: a caret sitting in whitespace, at a
/// word edge, or on an empty line has no word and the caller falls back to
/// whole-line treatment.
pub fn word_bounds_at<B: TextBuffer>(buf: &B, offset: usize) -> Option<Range<usize>> {
    let line = buf.line_range(offset);
    let text = buf.slice(line.clone())?;

    let rel = offset.checked_sub(line.start)?;
    if rel > text.len() || !text.is_char_boundary(rel) {
        return None;
    }

    let start_rel = text[..rel]
        .char_indices()
        .rev()
        .take_while(|(_, c)| !c.is_whitespace())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(rel);

    let end_rel = text[rel..]
        .char_indices()
        .take_while(|(_, c)| !c.is_whitespace())
        .last()
        .map(|(i, c)| rel + i + c.len_utf8())
        .unwrap_or(rel);

    if start_rel < rel && end_rel > rel {
        Some(line.start + start_rel..line.start + end_rel)
    } else {
        None
    }
}

/// Byte length of the leading whitespace of a line's text.
pub fn leading_indent(line: &str) -> usize {
    line.char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
