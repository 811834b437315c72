//! folio-editor-core: the hybrid markdown editing core.
//!
//! Hybrid mode shows a mostly-rendered document while keeping the line under
//! the caret raw and editable. This crate provides:
//! - the decoration engine: `compute_decorations` re-derives a sorted,
//!   conflict-free set of hide/mark/replace overlays from a syntax-tree
//!   snapshot on every document, viewport, or selection change
//! - the widget catalog the overlays replace text with
//! - the command engine: `execute` turns structural edit commands (toggle
//!   emphasis, heading, list, literal insertion) into declarative buffer
//!   edits plus a new selection
//!
//! The markdown parser, the undo history, and the host UI are external
//! collaborators: the parser hands in a `SyntaxNode` tree, the buffer is
//! reached through the `TextBuffer` trait, and rendering consumes the
//! returned `DecorationSet`. Nothing in the decoration path mutates text.

pub mod commands;
pub mod decorations;
pub mod execute;
pub mod text;
pub mod text_helpers;
pub mod tree;
pub mod types;
pub mod widget;

pub use commands::{CommandOutcome, EditCommand, EditResult, StructuralEdit, TextEdit};
pub use decorations::{
    DecorationError, DecorationKind, DecorationSet, DecorationSetBuilder, DecorationSpec,
    MarkStyle, active_line_window, compute_decorations,
};
pub use execute::execute;
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use tree::{Descend, NodeKind, SyntaxNode};
pub use types::Selection;
pub use widget::{ImageWidget, TableLayout, TableWidget, Widget, parse_image};
