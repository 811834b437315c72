//! Command execution.
//!
//! `execute` is the central dispatch point for structural edit commands.
//! It reads the buffer, never writes it: the outcome describes the edits
//! and the selection to apply. Unrecognized commands are logged and
//! ignored; nothing in here can fail.

use smol_str::{SmolStr, format_smolstr};
use tracing::debug;

use crate::commands::{CommandOutcome, EditCommand, EditResult, StructuralEdit, TextEdit};
use crate::text::TextBuffer;
use crate::text_helpers::{leading_indent, word_bounds_at};
use crate::types::Selection;

/// Literal inserted for a task checkbox item.
const TASK_CHECKBOX: &str = "- [ ] ";
/// Literal inserted for a fresh table row.
const TABLE_ROW: &str = "\n|  |  |";
/// Literal inserted for a fresh table column pair.
const TABLE_COL: &str = " |  |";

/// Execute a command against the current buffer and selection.
pub fn execute<B: TextBuffer>(
    command: &EditCommand,
    buf: &B,
    selection: Selection,
) -> CommandOutcome {
    match command {
        EditCommand::Bold => execute_wrap(buf, selection, "**"),
        EditCommand::Italic => execute_wrap(buf, selection, "*"),
        EditCommand::Heading(level) => execute_heading_toggle(buf, selection, *level),
        EditCommand::MakeList => execute_list_toggle(buf, selection),
        EditCommand::Indent => CommandOutcome::Delegated(StructuralEdit::Indent),
        EditCommand::Unindent => CommandOutcome::Delegated(StructuralEdit::Unindent),
        EditCommand::TaskCheckbox => insert_literal(selection, TASK_CHECKBOX),
        EditCommand::AddRow => insert_literal(selection, TABLE_ROW),
        EditCommand::AddCol => insert_literal(selection, TABLE_COL),
        EditCommand::Snippet(text) => insert_literal(selection, text),
        EditCommand::Other(name) => {
            debug!(command = %name, "ignoring unrecognized edit command");
            CommandOutcome::Ignored
        }
    }
}

/// Wrap the selection, the caret word, or the caret line in `marker`.
///
/// A non-empty selection is always wrapped additively, with the new
/// selection covering exactly the original text at its shifted position.
/// An empty selection wraps the word strictly under the caret; if the word
/// scan is blocked in either direction (whitespace, word edge, empty line),
/// the whole line is wrapped instead.
fn execute_wrap<B: TextBuffer>(buf: &B, selection: Selection, marker: &str) -> CommandOutcome {
    let target = if selection.is_collapsed() {
        word_bounds_at(buf, selection.head).unwrap_or_else(|| buf.line_range(selection.head))
    } else {
        selection.to_range()
    };

    let edits = vec![
        TextEdit::insert_at(target.start, marker),
        TextEdit::insert_at(target.end, marker),
    ];
    let shifted = Selection::new(target.start + marker.len(), target.end + marker.len());

    CommandOutcome::Edited(EditResult {
        edits,
        selection: shifted,
    })
}

/// Toggle an ATX heading marker of `level` on the caret line.
fn execute_heading_toggle<B: TextBuffer>(
    buf: &B,
    selection: Selection,
    level: u8,
) -> CommandOutcome {
    let line = buf.line_range(selection.head);
    let Some(text) = buf.slice(line.clone()) else {
        return CommandOutcome::Ignored;
    };

    let existing = heading_marker_len(&text);

    if let Some((marker_len, existing_level)) = existing {
        if existing_level == level {
            // Same level: pure toggle-off.
            return CommandOutcome::Edited(EditResult {
                edits: vec![TextEdit::delete(line.start, line.start + marker_len)],
                selection: Selection::collapsed(line.start),
            });
        }
    }

    // Replace the old marker span (empty when there was none) with the new
    // marker in one edit, so the batch stays order-independent.
    let replaced = existing.map(|(len, _)| len).unwrap_or(0);
    let marker = format_smolstr!("{} ", "#".repeat(level as usize));
    let caret = line.start + marker.len();

    CommandOutcome::Edited(EditResult {
        edits: vec![TextEdit {
            from: line.start,
            to: line.start + replaced,
            insert: marker,
        }],
        selection: Selection::collapsed(caret),
    })
}

/// Parse a leading `#`+ space marker; returns (marker byte length incl.
/// the space, heading level).
fn heading_marker_len(line: &str) -> Option<(usize, u8)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || !line[hashes..].starts_with(' ') {
        return None;
    }
    Some((hashes + 1, hashes.min(u8::MAX as usize) as u8))
}

/// Toggle a `- ` list marker on the caret line.
fn execute_list_toggle<B: TextBuffer>(buf: &B, selection: Selection) -> CommandOutcome {
    let line = buf.line_range(selection.head);
    let Some(text) = buf.slice(line.clone()) else {
        return CommandOutcome::Ignored;
    };

    let indent = leading_indent(&text);
    if text[indent..].starts_with("- ") {
        let marker_at = line.start + indent;
        return CommandOutcome::Edited(EditResult {
            edits: vec![TextEdit::delete(marker_at, marker_at + 2)],
            selection: Selection::collapsed(line.start),
        });
    }

    CommandOutcome::Edited(EditResult {
        edits: vec![TextEdit::insert_at(line.start, "- ")],
        selection: Selection::collapsed(line.start + 2),
    })
}

/// Insert fixed literal text at the caret, caret right after it.
fn insert_literal(selection: Selection, text: &str) -> CommandOutcome {
    let at = selection.head;
    CommandOutcome::Edited(EditResult {
        edits: vec![TextEdit::insert_at(at, SmolStr::new(text))],
        selection: Selection::collapsed(at + text.len()),
    })
}
