//! penmark-core: live markdown autoformat for a structured-text editor.
//!
//! As the user types, the engine recognizes markdown-like trigger sequences
//! and rewrites the in-progress document structure - block type, inline
//! emphasis marks, link wrapping - instead of inserting literal markdown
//! characters. A companion backspace rule undoes a block-level shortcut
//! before falling back to ordinary deletion.
//!
//! This crate provides:
//! - `EditorDocument` trait for the host-document capabilities the engine
//!   needs, and `TreeEditor`, a plain in-memory implementation
//! - `Document`/`Block`/`Inline` - the block/inline tree model
//! - `ShortcutTables` - the ordered, first-match-wins rule configuration
//! - `autoformat::insert_text` / `autoformat::delete_backward` - the
//!   per-keystroke interceptors
//!
//! The engine raises no errors: every decision point degrades to the default
//! action (insert the character, or ordinary deletion) on a non-match.

pub mod autoformat;
pub mod document;
pub mod shortcuts;
pub mod tree;
pub mod types;

pub use autoformat::{DeleteOutcome, ShortcutOutcome};
pub use document::{EditOp, EditStep, EditorDocument, TreeEditor};
pub use shortcuts::{BlockRule, InlineKind, InlineMatch, InlineRule, ShortcutError, ShortcutTables};
pub use smol_str::SmolStr;
pub use tree::{Block, BlockContent, Document, Inline, Link, TextRun};
pub use types::{BlockKind, Mark, MarkSet, NodePath, Position, Range};
