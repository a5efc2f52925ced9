//! Core engine types: block kinds, marks, positions, and ranges.
//!
//! All offsets are in Unicode scalar values (chars), not bytes. A `Position`
//! addresses a text run through a path of child indices from the document
//! root; for an empty block the path addresses the block itself with offset 0.

use smol_str::SmolStr;

/// The kind of a structural block node.
///
/// `Paragraph` is the host default. `BulletedList` and `NumberedList` are
/// containers: their children are `ListItem` blocks, never inline content.
/// `Custom` covers host-defined kinds the engine treats opaquely.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BlockQuote,
    ListItem,
    BulletedList,
    NumberedList,
    Custom(SmolStr),
}

impl BlockKind {
    /// Whether this kind holds nested blocks instead of inline content.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::BulletedList | Self::NumberedList)
    }

    /// Kebab-case name, as shown in outlines and logs.
    pub fn name(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading-1",
            Self::Heading2 => "heading-2",
            Self::Heading3 => "heading-3",
            Self::BlockQuote => "block-quote",
            Self::ListItem => "list-item",
            Self::BulletedList => "bulleted-list",
            Self::NumberedList => "numbered-list",
            Self::Custom(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Set of inline marks carried by a text run.
    ///
    /// Marks are idempotent booleans: applying one twice is the same as
    /// applying it once.
    #[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MarkSet: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const CODE = 1 << 2;
    }
}

/// A single inline mark.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Code,
}

impl Mark {
    /// The singleton `MarkSet` for this mark.
    pub fn as_set(self) -> MarkSet {
        match self {
            Self::Bold => MarkSet::BOLD,
            Self::Italic => MarkSet::ITALIC,
            Self::Code => MarkSet::CODE,
        }
    }
}

/// Path of child indices from the document root to a node.
pub type NodePath = Vec<usize>;

/// A caret location: a node path plus a char offset into the addressed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub path: NodePath,
    pub offset: usize,
}

impl Position {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// An ordered anchor/focus pair of positions.
///
/// The anchor is where the selection started, the focus is where the cursor
/// is now. Collapsed (anchor == focus) means a pure caret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    pub anchor: Position,
    pub focus: Position,
}

impl Range {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed range (caret) at the given position.
    pub fn collapsed(at: Position) -> Self {
        Self {
            anchor: at.clone(),
            focus: at,
        }
    }

    /// Check if the range is collapsed (no selected span, pure caret).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The caret position (focus end).
    pub fn caret(&self) -> &Position {
        &self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_as_set() {
        assert_eq!(Mark::Bold.as_set(), MarkSet::BOLD);
        assert_eq!(Mark::Italic.as_set(), MarkSet::ITALIC);
        assert_eq!(Mark::Code.as_set(), MarkSet::CODE);
    }

    #[test]
    fn test_mark_set_is_idempotent() {
        let mut marks = MarkSet::empty();
        marks |= MarkSet::BOLD;
        marks |= MarkSet::BOLD;
        assert_eq!(marks, MarkSet::BOLD);
    }

    #[test]
    fn test_container_kinds() {
        assert!(BlockKind::BulletedList.is_container());
        assert!(BlockKind::NumberedList.is_container());
        assert!(!BlockKind::ListItem.is_container());
        assert!(!BlockKind::Paragraph.is_container());
        assert!(!BlockKind::Custom("callout".into()).is_container());
    }

    #[test]
    fn test_range_collapsed() {
        let caret = Position::new(vec![0, 0], 3);
        let range = Range::collapsed(caret.clone());
        assert!(range.is_collapsed());
        assert_eq!(range.caret(), &caret);

        let range = Range::new(Position::new(vec![0, 0], 0), caret);
        assert!(!range.is_collapsed());
    }

    #[test]
    fn test_block_kind_names() {
        assert_eq!(BlockKind::Heading2.name(), "heading-2");
        assert_eq!(BlockKind::BulletedList.name(), "bulleted-list");
        assert_eq!(BlockKind::Custom("aside".into()).name(), "aside");
    }
}
