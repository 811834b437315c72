//! Core editor types shared by the decoration and command engines.
//!
//! All offsets in this crate are byte offsets into the buffer: the syntax
//! tree source reports byte ranges, and both engines work in that space.

use std::ops::Range;

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is
/// now. They may be in any order - use `start()` and `end()` for ordered
/// bounds. A collapsed selection is a caret.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Check if an offset is within the selection.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start() && offset < self.end()
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Check if the selection is backwards (head before anchor).
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = Selection::new(5, 10);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(!sel.is_backwards());

        // Backward selection
        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(7);
        assert!(sel.is_collapsed());
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert_eq!(sel.start(), 7);
        assert_eq!(sel.end(), 7);
    }

    #[test]
    fn test_selection_contains() {
        let sel = Selection::new(5, 10);
        assert!(!sel.contains(4));
        assert!(sel.contains(5));
        assert!(sel.contains(9));
        assert!(!sel.contains(10)); // end is exclusive
    }

    #[test]
    fn test_selection_to_range() {
        let sel = Selection::new(10, 5);
        assert_eq!(sel.to_range(), 5..10);
    }
}
