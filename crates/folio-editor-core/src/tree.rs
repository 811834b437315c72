//! Syntax tree snapshot consumed by the decoration engine.
//!
//! The markdown parser is an external collaborator; it hands the engine an
//! immutable tree of typed nodes with byte spans, tied to one buffer
//! revision. Node type names come from a fixed vocabulary plus an open set
//! the engine ignores, so classification happens once at construction into
//! a tagged enum instead of string-matching during traversal.

use std::ops::Range;

use smol_str::SmolStr;

/// Classification of a syntax node, parsed from the parser's type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A table block.
    Table,
    /// A thematic break (`---`, `***`).
    HorizontalRule,
    /// The `#` run (plus trailing space) of a heading.
    HeaderMark,
    /// A whole ATX heading block, with its level 1-6.
    Heading(u8),
    /// The literal marker of a list item (`-`, `*`, `1.`).
    ListMark,
    /// An inline image, `![alt](url)`.
    Image,
    /// `*` delimiters of emphasis.
    EmphasisMark,
    /// `**` delimiters of strong emphasis.
    StrongEmphasisMark,
    /// `>` of a blockquote line.
    BlockquoteMark,
    /// Backtick delimiters of a code span.
    CodeMark,
    /// Bracket/paren punctuation of a link.
    LinkMark,
    /// Any node type the engine does not decorate.
    Other(SmolStr),
}

impl NodeKind {
    /// Classify a parser type name.
    ///
    /// Heading blocks arrive as a prefixed family (`ATXHeading1` ..
    /// `ATXHeading6`); the level is the trailing digits. Anything
    /// unrecognized becomes `Other` and passes through traversal untouched.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Table" => Self::Table,
            "HorizontalRule" => Self::HorizontalRule,
            "HeaderMark" => Self::HeaderMark,
            "ListMark" => Self::ListMark,
            "Image" => Self::Image,
            "EmphasisMark" => Self::EmphasisMark,
            "StrongEmphasisMark" => Self::StrongEmphasisMark,
            "BlockquoteMark" => Self::BlockquoteMark,
            "CodeMark" => Self::CodeMark,
            "LinkMark" => Self::LinkMark,
            _ => {
                if let Some(digits) = name.strip_prefix("ATXHeading") {
                    if let Ok(level) = digits.parse::<u8>() {
                        if (1..=6).contains(&level) {
                            return Self::Heading(level);
                        }
                    }
                }
                Self::Other(SmolStr::new(name))
            }
        }
    }
}

/// Whether traversal should continue into a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    /// Visit the children.
    Children,
    /// Skip the subtree.
    Skip,
}

/// A typed, range-tagged node of the parsed document structure.
///
/// Immutable snapshot tied to one buffer revision. Spans are byte ranges
/// into that revision's text; children are in document order and nested
/// within the parent span.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Range<usize>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a leaf node from a parser type name.
    pub fn new(name: &str, span: Range<usize>) -> Self {
        Self {
            kind: NodeKind::from_name(name),
            span,
            children: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn with_children(name: &str, span: Range<usize>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: NodeKind::from_name(name),
            span,
            children,
        }
    }

    /// Check if the node's span overlaps a byte range (inclusive of touch).
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.span.start <= range.end && self.span.end >= range.start
    }

    /// Depth-first traversal of nodes overlapping `range`.
    ///
    /// `enter` is called for every overlapping node, parents before
    /// children; returning `Descend::Skip` prunes the subtree. Nodes outside
    /// the range are pruned wholesale, so a pass is linear in the number of
    /// nodes actually visited.
    pub fn iterate<F>(&self, range: &Range<usize>, enter: &mut F)
    where
        F: FnMut(&SyntaxNode) -> Descend,
    {
        if !self.overlaps(range) {
            return;
        }
        if enter(self) == Descend::Skip {
            return;
        }
        for child in &self.children {
            child.iterate(range, enter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(NodeKind::from_name("Table"), NodeKind::Table);
        assert_eq!(NodeKind::from_name("HeaderMark"), NodeKind::HeaderMark);
        assert_eq!(NodeKind::from_name("ATXHeading1"), NodeKind::Heading(1));
        assert_eq!(NodeKind::from_name("ATXHeading6"), NodeKind::Heading(6));
        assert_eq!(
            NodeKind::from_name("ATXHeading7"),
            NodeKind::Other("ATXHeading7".into())
        );
        assert_eq!(
            NodeKind::from_name("Paragraph"),
            NodeKind::Other("Paragraph".into())
        );
    }

    #[test]
    fn test_overlaps() {
        let node = SyntaxNode::new("Paragraph", 10..20);
        assert!(node.overlaps(&(0..10))); // touching counts
        assert!(node.overlaps(&(15..15)));
        assert!(node.overlaps(&(20..30)));
        assert!(!node.overlaps(&(21..30)));
        assert!(!node.overlaps(&(0..9)));
    }

    #[test]
    fn test_iterate_prunes_by_range() {
        let tree = SyntaxNode::with_children(
            "Document",
            0..30,
            vec![
                SyntaxNode::new("Paragraph", 0..9),
                SyntaxNode::new("Paragraph", 11..20),
                SyntaxNode::new("Paragraph", 22..30),
            ],
        );

        let mut visited = Vec::new();
        tree.iterate(&(11..20), &mut |node| {
            visited.push(node.span.clone());
            Descend::Children
        });

        assert_eq!(visited, vec![0..30, 11..20]);
    }

    #[test]
    fn test_iterate_skip_prunes_subtree() {
        let tree = SyntaxNode::with_children(
            "Document",
            0..10,
            vec![SyntaxNode::with_children(
                "Table",
                0..10,
                vec![SyntaxNode::new("TableDelimiter", 2..3)],
            )],
        );

        let mut visited = Vec::new();
        tree.iterate(&(0..10), &mut |node| {
            visited.push(node.kind.clone());
            if node.kind == NodeKind::Table {
                Descend::Skip
            } else {
                Descend::Children
            }
        });

        assert_eq!(
            visited,
            vec![NodeKind::Other("Document".into()), NodeKind::Table]
        );
    }
}
