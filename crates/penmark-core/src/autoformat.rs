//! The autoformat interceptors.
//!
//! `insert_text` runs once per character-insertion event and either fires a
//! shortcut (rewriting document structure) or falls through to the host's
//! default insertion. `delete_backward` implements the outdent-before-merge
//! backspace rule and never consults the tables.
//!
//! Both entry points bracket their work in one edit step, so observers see
//! each keystroke as a single coalesced mutation. On a non-match they fall
//! through with zero structural side effects.

use tracing::debug;

use crate::document::EditorDocument;
use crate::shortcuts::{InlineKind, InlineMatch, ShortcutTables};
use crate::types::{BlockKind, Position, Range};

/// What an insertion keystroke resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// A block rule fired and retyped the enclosing block.
    Block(BlockKind),
    /// An inline rule fired and consumed the in-flight character.
    Inline(InlineKind),
    /// No rule fired; the character was inserted verbatim.
    Inserted,
}

/// What a backward-deletion keystroke resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The keystroke was consumed as an outdent; nothing was deleted.
    Outdented,
    /// Ordinary backward deletion ran.
    Deleted,
}

/// Intercept a character insertion.
///
/// Resolution order: block rule (space only, short-circuits), then inline
/// rule, then default insertion. Block rules win when both could apply.
pub fn insert_text<D: EditorDocument>(
    doc: &mut D,
    tables: &ShortcutTables,
    text: &str,
) -> ShortcutOutcome {
    doc.begin_step();
    let outcome = run_insert(doc, tables, text);
    doc.commit_step();
    outcome
}

fn run_insert<D: EditorDocument>(
    doc: &mut D,
    tables: &ShortcutTables,
    text: &str,
) -> ShortcutOutcome {
    let sel = match doc.selection() {
        Some(sel) if sel.is_collapsed() => sel,
        // No selection, or a non-collapsed range: default insertion only.
        _ => {
            doc.insert_text(text);
            return ShortcutOutcome::Inserted;
        }
    };
    let caret = sel.focus;

    if text == " " {
        if let Some(kind) = try_block_shortcut(doc, tables, &caret) {
            return ShortcutOutcome::Block(kind);
        }
    }

    if let Some(kind) = try_inline_shortcut(doc, tables, &caret, text) {
        return ShortcutOutcome::Inline(kind);
    }

    doc.insert_text(text);
    ShortcutOutcome::Inserted
}

/// Match the line prefix against the block table and apply the rule:
/// select + delete the prefix, retype the block, wrap list items.
fn try_block_shortcut<D: EditorDocument>(
    doc: &mut D,
    tables: &ShortcutTables,
    caret: &Position,
) -> Option<BlockKind> {
    let (block_path, _) = doc.enclosing_block(caret)?;
    let start = doc.block_start(caret)?;
    let prefix = doc.text_between(&start, caret)?;
    if prefix.is_empty() {
        return None;
    }
    let rule = tables.resolve_block(&prefix)?;
    let produces = rule.produces.clone();
    let container = rule.container.clone();
    debug!(%prefix, kind = %produces, "applying block shortcut");

    let range = Range::new(start, caret.clone());
    doc.select(range.clone());
    doc.delete_range(&range);
    doc.set_block_kind(&block_path, produces.clone());
    if let Some(container) = container {
        doc.wrap_in_container(&block_path, container);
    }
    Some(produces)
}

/// Match the current run plus the in-flight character against the inline
/// table and apply the rule: trim delimiters, then mark or wrap.
fn try_inline_shortcut<D: EditorDocument>(
    doc: &mut D,
    tables: &ShortcutTables,
    caret: &Position,
    text: &str,
) -> Option<InlineKind> {
    let run_start = Position::new(caret.path.clone(), 0);
    let before = doc.text_between(&run_start, caret)?;
    let mut candidate = String::with_capacity(before.len() + text.len());
    candidate.push_str(&before);
    candidate.push_str(text);

    let matched = tables.resolve_inline(&candidate)?;
    let kind = matched.kind();
    debug!(%candidate, ?kind, "applying inline shortcut");

    match matched {
        InlineMatch::Emphasis {
            mark,
            open_len,
            inner_len,
            close_len,
        } => {
            let mut caret_off = caret.offset;
            // The close delimiter's last char is the in-flight character and
            // was never committed to the document.
            let trailing = close_len - 1;
            delete_back_span(doc, &caret.path, caret_off, trailing);
            caret_off -= trailing;
            delete_back_span(doc, &caret.path, caret_off - inner_len, open_len);
            caret_off -= open_len;

            let inner = Range::new(
                Position::new(caret.path.clone(), caret_off - inner_len),
                Position::new(caret.path.clone(), caret_off),
            );
            doc.apply_mark(&inner, mark);
            doc.clear_pending_mark();
        }
        InlineMatch::Link {
            open_len,
            text_len,
            middle_len,
            url,
            close_len,
        } => {
            let mut caret_off = caret.offset;
            let url_len = url.chars().count();
            let trailing = middle_len + url_len + (close_len - 1);
            delete_back_span(doc, &caret.path, caret_off, trailing);
            caret_off -= trailing;
            delete_back_span(doc, &caret.path, caret_off - text_len, open_len);
            caret_off -= open_len;

            let span = Range::new(
                Position::new(caret.path.clone(), caret_off - text_len),
                Position::new(caret.path.clone(), caret_off),
            );
            doc.wrap_in_link(&span, &url);
        }
    }
    Some(kind)
}

/// Intercept a backward deletion.
///
/// A caret at the start of a non-default, non-list-item block consumes the
/// keystroke as an outdent back to the default kind; everything else is the
/// host's ordinary backward deletion.
pub fn delete_backward<D: EditorDocument>(doc: &mut D) -> DeleteOutcome {
    doc.begin_step();
    let outcome = run_delete(doc);
    doc.commit_step();
    outcome
}

fn run_delete<D: EditorDocument>(doc: &mut D) -> DeleteOutcome {
    if let Some(sel) = doc.selection() {
        if sel.is_collapsed() {
            let caret = sel.focus;
            let enclosing = doc
                .enclosing_block(&caret)
                .map(|(path, block)| (path, block.kind.clone()));
            if let Some((block_path, kind)) = enclosing {
                let at_start = doc
                    .block_start(&caret)
                    .is_some_and(|start| start == caret);
                if at_start && kind != doc.default_block_kind() && kind != BlockKind::ListItem {
                    debug!(kind = %kind, "backspace outdent");
                    doc.set_block_kind(&block_path, doc.default_block_kind());
                    return DeleteOutcome::Outdented;
                }
            }
        }
    }
    doc.delete_backward();
    DeleteOutcome::Deleted
}

/// Delete a fixed-length span ending at `end` on one node. No-op when the
/// span is empty.
pub fn delete_back_span<D: EditorDocument>(doc: &mut D, path: &[usize], end: usize, len: usize) {
    if len == 0 {
        return;
    }
    let range = Range::new(
        Position::new(path.to_vec(), end - len),
        Position::new(path.to_vec(), end),
    );
    doc.delete_range(&range);
}
