//! Selection types for the editing surface.

use super::cursor::Point;

/// A text selection with anchor (start point) and head (caret position).
/// The anchor stays fixed while the head moves during selection extension.
///
/// Points are tree positions, so ordering between anchor and head is decided
/// by the surface (`Surface::ordered`), not by the points themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: Point,
    /// Where the caret is (moving point)
    pub head: Point,
}

impl Selection {
    pub fn new(anchor: Point, head: Point) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no selection)
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            head: point,
        }
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Extend selection to new head position
    pub fn extend_to(&mut self, point: Point) {
        self.head = point;
    }

    /// Collapse selection to head position
    pub fn collapse(&mut self) {
        self.anchor = self.head;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::NodeId;

    fn p(node: usize, offset: usize) -> Point {
        Point::new(NodeId::from_raw(node), offset)
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(p(1, 5));
        assert!(sel.is_collapsed());
        assert_eq!(sel.anchor, sel.head);
    }

    #[test]
    fn test_selection_extend_and_collapse() {
        let mut sel = Selection::collapsed(p(1, 0));
        sel.extend_to(p(1, 10));
        assert!(!sel.is_collapsed());
        assert_eq!(sel.anchor, p(1, 0));

        sel.collapse();
        assert!(sel.is_collapsed());
        assert_eq!(sel.anchor, p(1, 10));
    }
}
