//! Command vocabulary and declarative edit results.
//!
//! `EditCommand` is the fixed, named enumeration the UI dispatches (toolbar
//! clicks, keybindings). Executing one never mutates anything here: the
//! engine returns a `CommandOutcome` describing the buffer edits and new
//! selection, which the buffer collaborator applies atomically.

use smol_str::SmolStr;

use crate::text::TextBuffer;
use crate::types::Selection;

/// A structural edit command issued by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Toggle `**` emphasis on the selection or caret word.
    Bold,
    /// Toggle `*` emphasis on the selection or caret word.
    Italic,
    /// Toggle an ATX heading of the given level on the caret line.
    Heading(u8),
    /// Toggle a `- ` list marker on the caret line.
    MakeList,
    /// Delegate to the buffer's structural indent primitive.
    Indent,
    /// Delegate to the buffer's structural outdent primitive.
    Unindent,
    /// Insert a task checkbox literal at the caret.
    TaskCheckbox,
    /// Insert a table-row literal at the caret.
    AddRow,
    /// Insert a table-column literal at the caret.
    AddCol,
    /// Insert an arbitrary literal snippet at the caret.
    Snippet(SmolStr),
    /// A command name this engine does not recognize. Logged, never an error.
    Other(SmolStr),
}

impl EditCommand {
    /// Map a UI action name to a command.
    ///
    /// The names are the UI's fixed vocabulary; anything else becomes
    /// `Other` and executes as a logged no-op.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Bold" => Self::Bold,
            "Italic" => Self::Italic,
            "H1" => Self::Heading(1),
            "H2" => Self::Heading(2),
            "H3" => Self::Heading(3),
            "Make List" => Self::MakeList,
            "Indent" => Self::Indent,
            "Unindent" => Self::Unindent,
            "Task Checkbox" => Self::TaskCheckbox,
            "Add Row" => Self::AddRow,
            "Add Col" => Self::AddCol,
            _ => Self::Other(SmolStr::new(name)),
        }
    }
}

/// One buffer edit. `from`/`to` are byte offsets into the document as it
/// was when the command executed; a batch is applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: SmolStr,
}

impl TextEdit {
    /// An insertion at a single offset.
    pub fn insert_at(offset: usize, text: impl Into<SmolStr>) -> Self {
        Self {
            from: offset,
            to: offset,
            insert: text.into(),
        }
    }

    /// A deletion of a range.
    pub fn delete(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            insert: SmolStr::default(),
        }
    }
}

/// Edits plus the selection to set once they are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub edits: Vec<TextEdit>,
    pub selection: Selection,
}

impl EditResult {
    /// Apply the edits to a buffer, back to front so earlier offsets stay
    /// valid. This is the same application order the buffer collaborator
    /// uses; tests and simple embedders go through it.
    pub fn apply_to<B: TextBuffer>(&self, buf: &mut B) {
        let mut edits: Vec<&TextEdit> = self.edits.iter().collect();
        edits.sort_by_key(|e| e.from);
        for edit in edits.into_iter().rev() {
            buf.replace(edit.from..edit.to, &edit.insert);
        }
    }
}

/// The buffer collaborator's generic structural primitives the engine
/// selects by name rather than reimplementing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralEdit {
    Indent,
    Unindent,
}

/// What executing a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Apply these edits and selection atomically.
    Edited(EditResult),
    /// Invoke the named structural primitive on the buffer.
    Delegated(StructuralEdit),
    /// Unrecognized command; nothing to do.
    Ignored,
}
