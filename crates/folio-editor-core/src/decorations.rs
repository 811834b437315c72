//! The decoration engine.
//!
//! Recomputes the visual overlay for the visible part of the document:
//! a sorted, non-overlapping sequence of hide/mark/replace operations
//! derived from the syntax tree and gated on the active (caret) line.
//! Runs in full on every document, viewport, or selection change; the pass
//! is linear in the number of visible syntax nodes and never mutates the
//! buffer.

use std::ops::Range;

use smol_str::{SmolStr, format_smolstr};
use thiserror::Error;
use tracing::trace;

use crate::text::TextBuffer;
use crate::tree::{Descend, NodeKind, SyntaxNode};
use crate::types::Selection;
use crate::widget::{TableWidget, Widget, parse_image};

/// Errors from a decoration pass.
///
/// Both variants are caller bugs, not user-visible conditions: the engine
/// must always be invoked with a tree and buffer from the same revision and
/// feeds its builder in sorted order. They are surfaced rather than
/// tolerated so a desynchronized recompute trigger is caught early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorationError {
    /// A node span fell outside the buffer - the tree snapshot and buffer
    /// text are from different revisions.
    #[error("node span {start}..{end} out of bounds for buffer of {len} bytes")]
    SliceOutOfBounds { start: usize, end: usize, len: usize },

    /// Specs were fed to the builder out of `(from, to)` order.
    #[error("decoration {from}..{to} inserted out of order")]
    OutOfOrder { from: usize, to: usize },
}

/// Styling tag for a `Mark` decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkStyle {
    /// Heading text at a given level.
    Heading(u8),
}

impl MarkStyle {
    /// CSS-class-shaped tag for the renderer.
    pub fn class(&self) -> SmolStr {
        match self {
            Self::Heading(level) => format_smolstr!("folio-heading-{level}"),
        }
    }
}

/// What a decoration does to its byte range.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    /// Suppress the range visually; the text stays in the buffer.
    Hide,
    /// Style the range without hiding it.
    Mark(MarkStyle),
    /// Substitute a widget for the range.
    Replace(Widget),
}

/// One declarative overlay instruction. Ephemeral: a generation lives for
/// exactly one recompute pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationSpec {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
}

impl DecorationSpec {
    fn new(span: &Range<usize>, kind: DecorationKind) -> Self {
        Self {
            from: span.start,
            to: span.end,
            kind,
        }
    }
}

/// The sorted, deduplicated sequence of specs ready for rendering.
///
/// Ordering invariant: `from` ascending, then `to` ascending, so for equal
/// starts the shorter span precedes the longer one. The range container the
/// overlay feeds requires insertion in exactly this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationSet {
    specs: Vec<DecorationSpec>,
}

impl DecorationSet {
    pub fn iter(&self) -> impl Iterator<Item = &DecorationSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn as_slice(&self) -> &[DecorationSpec] {
        &self.specs
    }
}

/// Builder enforcing the set's ordering precondition.
///
/// Feeding it out of order is an error, not a silent reorder: the caller is
/// expected to have sorted already, and a violation means the traversal
/// emitted something the range container would reject.
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    specs: Vec<DecorationSpec>,
}

impl DecorationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spec; must be `>=` the previous one in `(from, to)` order.
    /// Exact duplicates are dropped.
    pub fn add(&mut self, spec: DecorationSpec) -> Result<(), DecorationError> {
        if let Some(last) = self.specs.last() {
            if (spec.from, spec.to) < (last.from, last.to) {
                return Err(DecorationError::OutOfOrder {
                    from: spec.from,
                    to: spec.to,
                });
            }
            if *last == spec {
                return Ok(());
            }
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn finish(self) -> DecorationSet {
        DecorationSet { specs: self.specs }
    }
}

/// Byte span of the line containing the selection head.
///
/// Derived fresh from the current selection and buffer line boundaries on
/// every pass; never cached across edits.
pub fn active_line_window<B: TextBuffer>(buf: &B, selection: &Selection) -> Range<usize> {
    buf.line_range(selection.head)
}

/// Compute the decoration set for the visible ranges of one buffer revision.
///
/// Pure function of its inputs; safe to call on every keystroke.
/// `active_line` is the span from [`active_line_window`]. Nodes overlapping
/// the active line emit nothing themselves (the edited line stays raw) but
/// their children are still visited, since a multi-line construct can have
/// sub-spans outside the window.
pub fn compute_decorations<B: TextBuffer>(
    tree: &SyntaxNode,
    visible_ranges: &[Range<usize>],
    active_line: &Range<usize>,
    buf: &B,
) -> Result<DecorationSet, DecorationError> {
    let mut specs: Vec<DecorationSpec> = Vec::new();
    let mut revision_error: Option<DecorationError> = None;

    for visible in visible_ranges {
        tree.iterate(visible, &mut |node| {
            if revision_error.is_some() {
                return Descend::Skip;
            }
            match decorate_node(node, active_line, buf, &mut specs) {
                Ok(descend) => descend,
                Err(err) => {
                    revision_error = Some(err);
                    Descend::Skip
                }
            }
        });
    }

    if let Some(err) = revision_error {
        return Err(err);
    }

    // Stable tree order already nearly satisfies the container's ordering,
    // but it is a hard precondition, so sort rather than trust it.
    specs.sort_by_key(|s| (s.from, s.to));

    trace!(specs = specs.len(), "decoration pass complete");

    let mut builder = DecorationSetBuilder::new();
    for spec in specs {
        builder.add(spec)?;
    }
    Ok(builder.finish())
}

/// Apply the decoration rules to one node. Returns how traversal proceeds.
fn decorate_node<B: TextBuffer>(
    node: &SyntaxNode,
    active_line: &Range<usize>,
    buf: &B,
    specs: &mut Vec<DecorationSpec>,
) -> Result<Descend, DecorationError> {
    let cursor_inside = node.overlaps(active_line);

    // Block constructs replace wholesale when the caret is elsewhere; their
    // internal marker nodes are irrelevant once replaced.
    match node.kind {
        NodeKind::Table if !cursor_inside => {
            let raw = slice_span(buf, &node.span)?;
            specs.push(DecorationSpec::new(
                &node.span,
                DecorationKind::Replace(Widget::Table(TableWidget::new(raw))),
            ));
            return Ok(Descend::Skip);
        }
        NodeKind::HorizontalRule if !cursor_inside => {
            specs.push(DecorationSpec::new(
                &node.span,
                DecorationKind::Replace(Widget::HorizontalRule),
            ));
            return Ok(Descend::Skip);
        }
        _ => {}
    }

    // Anything touching the active line stays raw. Children are still
    // visited: parts of a multi-line node can sit outside the window.
    if cursor_inside {
        return Ok(Descend::Children);
    }

    match &node.kind {
        NodeKind::HeaderMark => {
            specs.push(DecorationSpec::new(&node.span, DecorationKind::Hide));
        }
        NodeKind::Heading(level) => {
            specs.push(DecorationSpec::new(
                &node.span,
                DecorationKind::Mark(MarkStyle::Heading(*level)),
            ));
        }
        NodeKind::ListMark => {
            specs.push(DecorationSpec::new(
                &node.span,
                DecorationKind::Replace(Widget::Bullet),
            ));
        }
        NodeKind::Image => {
            let raw = slice_span(buf, &node.span)?;
            // Malformed image syntax is left raw, and we keep descending.
            if let Some(img) = parse_image(&raw) {
                specs.push(DecorationSpec::new(
                    &node.span,
                    DecorationKind::Replace(Widget::Image(img)),
                ));
                return Ok(Descend::Skip);
            }
        }
        NodeKind::EmphasisMark
        | NodeKind::StrongEmphasisMark
        | NodeKind::BlockquoteMark
        | NodeKind::CodeMark
        | NodeKind::LinkMark => {
            specs.push(DecorationSpec::new(&node.span, DecorationKind::Hide));
        }
        NodeKind::Table | NodeKind::HorizontalRule | NodeKind::Other(_) => {}
    }

    Ok(Descend::Children)
}

fn slice_span<B: TextBuffer>(
    buf: &B,
    span: &Range<usize>,
) -> Result<SmolStr, DecorationError> {
    buf.slice(span.clone())
        .ok_or(DecorationError::SliceOutOfBounds {
            start: span.start,
            end: span.end,
            len: buf.len_bytes(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EditorRope;

    fn doc(text: &str) -> EditorRope {
        EditorRope::from_str(text)
    }

    /// Active line that overlaps nothing.
    fn caret_nowhere(buf: &EditorRope) -> Range<usize> {
        let len = buf.len_bytes();
        len + 100..len + 100
    }

    #[test]
    fn test_header_mark_hidden_and_heading_marked() {
        let buf = doc("# Title\nbody");
        let tree = SyntaxNode::with_children(
            "Document",
            0..12,
            vec![SyntaxNode::with_children(
                "ATXHeading1",
                0..7,
                vec![SyntaxNode::new("HeaderMark", 0..1)],
            )],
        );
        // caret on the second line
        let active = active_line_window(&buf, &Selection::collapsed(9));
        let set = compute_decorations(&tree, &[0..12], &active, &buf).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].from, 0);
        assert_eq!(set.as_slice()[0].to, 1);
        assert_eq!(set.as_slice()[0].kind, DecorationKind::Hide);
        assert_eq!(
            set.as_slice()[1].kind,
            DecorationKind::Mark(MarkStyle::Heading(1))
        );
        assert_eq!((set.as_slice()[1].from, set.as_slice()[1].to), (0, 7));
    }

    #[test]
    fn test_active_line_suppresses_decorations() {
        let buf = doc("# Title\nbody");
        let tree = SyntaxNode::with_children(
            "Document",
            0..12,
            vec![SyntaxNode::with_children(
                "ATXHeading1",
                0..7,
                vec![SyntaxNode::new("HeaderMark", 0..1)],
            )],
        );
        // caret inside the heading line: everything stays raw
        let active = active_line_window(&buf, &Selection::collapsed(3));
        let set = compute_decorations(&tree, &[0..12], &active, &buf).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_active_line_invariant() {
        // No emitted decoration may cover a range overlapping the caret line.
        let text = "# One\n\n- item\n\n**bold** text\n";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..text.len(),
            vec![
                SyntaxNode::with_children(
                    "ATXHeading1",
                    0..5,
                    vec![SyntaxNode::new("HeaderMark", 0..1)],
                ),
                SyntaxNode::with_children(
                    "BulletList",
                    7..13,
                    vec![SyntaxNode::with_children(
                        "ListItem",
                        7..13,
                        vec![SyntaxNode::new("ListMark", 7..8)],
                    )],
                ),
                SyntaxNode::with_children(
                    "StrongEmphasis",
                    15..23,
                    vec![
                        SyntaxNode::new("StrongEmphasisMark", 15..17),
                        SyntaxNode::new("StrongEmphasisMark", 21..23),
                    ],
                ),
            ],
        );

        for caret in 0..=text.len() {
            let sel = Selection::collapsed(caret);
            let active = active_line_window(&buf, &sel);
            let set = compute_decorations(&tree, &[0..text.len()], &active, &buf).unwrap();
            for spec in set.iter() {
                assert!(
                    spec.to < active.start || spec.from > active.end,
                    "caret {caret}: spec {}..{} overlaps active line {active:?}",
                    spec.from,
                    spec.to
                );
            }
        }
    }

    #[test]
    fn test_table_replaced_when_inactive() {
        let text = "before\n| A | B |\n| --- | --- |\n| 1 | 2 |";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..text.len(),
            vec![SyntaxNode::with_children(
                "Table",
                7..text.len(),
                vec![SyntaxNode::new("TableDelimiter", 17..30)],
            )],
        );

        let active = active_line_window(&buf, &Selection::collapsed(2));
        let set = compute_decorations(&tree, &[0..text.len()], &active, &buf).unwrap();

        assert_eq!(set.len(), 1);
        let spec = &set.as_slice()[0];
        assert_eq!((spec.from, spec.to), (7, text.len()));
        match &spec.kind {
            DecorationKind::Replace(Widget::Table(t)) => {
                assert_eq!(t.raw, &text[7..]);
            }
            other => panic!("expected table replace, got {other:?}"),
        }
    }

    #[test]
    fn test_table_raw_when_cursor_inside() {
        let text = "| A | B |\n| --- | --- |\n| 1 | 2 |";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..text.len(),
            vec![SyntaxNode::new("Table", 0..text.len())],
        );

        // caret on the separator line, inside the table
        let active = active_line_window(&buf, &Selection::collapsed(12));
        let set = compute_decorations(&tree, &[0..text.len()], &active, &buf).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_horizontal_rule_replaced() {
        let text = "a\n---\nb";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..7,
            vec![SyntaxNode::new("HorizontalRule", 2..5)],
        );

        let active = active_line_window(&buf, &Selection::collapsed(0));
        let set = compute_decorations(&tree, &[0..7], &active, &buf).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.as_slice()[0].kind,
            DecorationKind::Replace(Widget::HorizontalRule)
        );
    }

    #[test]
    fn test_image_replaced_and_malformed_left_raw() {
        let text = "![cat](cat.png)\n\n![broken](oops\n";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..text.len(),
            vec![
                SyntaxNode::new("Image", 0..15),
                SyntaxNode::new("Image", 17..31),
            ],
        );

        let active = caret_nowhere(&buf);
        let set = compute_decorations(&tree, &[0..text.len()], &active, &buf).unwrap();

        assert_eq!(set.len(), 1);
        match &set.as_slice()[0].kind {
            DecorationKind::Replace(Widget::Image(img)) => {
                assert_eq!(img.url, "cat.png");
                assert_eq!(img.alt, "cat");
            }
            other => panic!("expected image replace, got {other:?}"),
        }
    }

    #[test]
    fn test_list_and_inline_marks() {
        let text = "- *hi*\nx";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..8,
            vec![SyntaxNode::with_children(
                "ListItem",
                0..6,
                vec![
                    SyntaxNode::new("ListMark", 0..1),
                    SyntaxNode::with_children(
                        "Emphasis",
                        2..6,
                        vec![
                            SyntaxNode::new("EmphasisMark", 2..3),
                            SyntaxNode::new("EmphasisMark", 5..6),
                        ],
                    ),
                ],
            )],
        );

        let active = active_line_window(&buf, &Selection::collapsed(8));
        let set = compute_decorations(&tree, &[0..8], &active, &buf).unwrap();

        let kinds: Vec<_> = set.iter().map(|s| (s.from, s.to, s.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (0, 1, DecorationKind::Replace(Widget::Bullet)),
                (2, 3, DecorationKind::Hide),
                (5, 6, DecorationKind::Hide),
            ]
        );
    }

    #[test]
    fn test_visible_range_prunes() {
        let text = "# A\n# B";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..7,
            vec![
                SyntaxNode::with_children(
                    "ATXHeading1",
                    0..3,
                    vec![SyntaxNode::new("HeaderMark", 0..1)],
                ),
                SyntaxNode::with_children(
                    "ATXHeading1",
                    4..7,
                    vec![SyntaxNode::new("HeaderMark", 4..5)],
                ),
            ],
        );

        let active = caret_nowhere(&buf);
        // only the second heading is visible (no touch with 0..3)
        let set = compute_decorations(&tree, &[4..7], &active, &buf).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|s| s.from >= 4));
    }

    #[test]
    fn test_ordering_invariant() {
        let text = "# T *a* **b**\nz";
        let buf = doc(text);
        let tree = SyntaxNode::with_children(
            "Document",
            0..15,
            vec![SyntaxNode::with_children(
                "ATXHeading1",
                0..13,
                vec![
                    SyntaxNode::new("HeaderMark", 0..1),
                    SyntaxNode::new("EmphasisMark", 4..5),
                    SyntaxNode::new("EmphasisMark", 6..7),
                    SyntaxNode::new("StrongEmphasisMark", 8..10),
                    SyntaxNode::new("StrongEmphasisMark", 11..13),
                ],
            )],
        );

        let active = active_line_window(&buf, &Selection::collapsed(15));
        let set = compute_decorations(&tree, &[0..15], &active, &buf).unwrap();

        let mut prev = (0usize, 0usize);
        for spec in set.iter() {
            assert!((spec.from, spec.to) >= prev, "set not sorted");
            prev = (spec.from, spec.to);
        }
        // heading mark (0..13) sorts after the header-mark hide (0..1)
        assert_eq!(set.as_slice()[0].kind, DecorationKind::Hide);
        assert_eq!(
            set.as_slice()[1].kind,
            DecorationKind::Mark(MarkStyle::Heading(1))
        );
    }

    #[test]
    fn test_revision_mismatch_is_fatal() {
        let buf = doc("short");
        // tree from a longer, stale revision
        let tree = SyntaxNode::with_children(
            "Document",
            0..50,
            vec![SyntaxNode::new("Image", 20..40)],
        );

        let err = compute_decorations(&tree, &[0..50], &(100..100), &buf).unwrap_err();
        assert_eq!(
            err,
            DecorationError::SliceOutOfBounds {
                start: 20,
                end: 40,
                len: 5
            }
        );
    }

    #[test]
    fn test_builder_rejects_out_of_order() {
        let mut builder = DecorationSetBuilder::new();
        builder
            .add(DecorationSpec {
                from: 5,
                to: 10,
                kind: DecorationKind::Hide,
            })
            .unwrap();
        let err = builder
            .add(DecorationSpec {
                from: 5,
                to: 8,
                kind: DecorationKind::Hide,
            })
            .unwrap_err();
        assert_eq!(err, DecorationError::OutOfOrder { from: 5, to: 8 });
    }

    #[test]
    fn test_builder_dedups() {
        let mut builder = DecorationSetBuilder::new();
        let spec = DecorationSpec {
            from: 1,
            to: 2,
            kind: DecorationKind::Hide,
        };
        builder.add(spec.clone()).unwrap();
        builder.add(spec).unwrap();
        assert_eq!(builder.finish().len(), 1);
    }

    #[test]
    fn test_mark_style_class() {
        assert_eq!(MarkStyle::Heading(2).class(), "folio-heading-2");
    }

    #[test]
    fn test_active_line_window_derivation() {
        let buf = doc("one\ntwo\nthree");
        assert_eq!(active_line_window(&buf, &Selection::collapsed(5)), 4..7);
        // range selection: the head's line wins
        assert_eq!(active_line_window(&buf, &Selection::new(0, 9)), 8..13);
        assert_eq!(active_line_window(&buf, &Selection::new(9, 0)), 0..3);
    }
}
