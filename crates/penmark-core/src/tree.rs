//! The block/inline document tree and its low-level editing primitives.
//!
//! Blocks form an ordered tree under the document root; list containers hold
//! nested `ListItem` blocks, every other block holds inline content. Inline
//! content is a sequence of text runs (string + mark set) and link nodes
//! (inline containers carrying a URL).
//!
//! The splice/mark/wrap primitives at the bottom of this module operate on an
//! inline list through *flat* char offsets (link children count toward the
//! flat text). Hosts map `Position`s to flat offsets and back; the functions
//! themselves never see paths.

use std::ops::Range as CharSpan;

use smol_str::SmolStr;

use crate::types::{BlockKind, MarkSet, NodePath, Position};

/// A leaf text node: a string plus the marks it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub content: String,
    pub marks: MarkSet,
}

impl TextRun {
    pub fn new(content: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            content: content.into(),
            marks,
        }
    }

    /// An unmarked run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, MarkSet::empty())
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// An inline link: a URL wrapping a sequence of inline children.
///
/// A link is a container, not a mark - its children keep their own marks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub url: SmolStr,
    pub children: Vec<Inline>,
}

/// An inline node: a text run or a link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    Link(Link),
}

impl Inline {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextRun::plain(content))
    }

    pub fn marked(content: impl Into<String>, marks: MarkSet) -> Self {
        Self::Text(TextRun::new(content, marks))
    }

    pub fn link(url: impl Into<SmolStr>, children: Vec<Inline>) -> Self {
        Self::Link(Link {
            url: url.into(),
            children,
        })
    }

    /// Length in chars (link children count).
    pub fn len(&self) -> usize {
        match self {
            Self::Text(run) => run.len(),
            Self::Link(link) => inlines_len(&link.children),
        }
    }
}

/// Content of a block: inline nodes, or nested blocks for list containers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockContent {
    Inlines(Vec<Inline>),
    Blocks(Vec<Block>),
}

/// A structural block node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub content: BlockContent,
}

impl Block {
    pub fn new(kind: BlockKind, inlines: Vec<Inline>) -> Self {
        Self {
            kind,
            content: BlockContent::Inlines(inlines),
        }
    }

    /// A paragraph holding a single plain run (no runs when `text` is empty).
    pub fn paragraph(text: &str) -> Self {
        let inlines = if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::text(text)]
        };
        Self::new(BlockKind::Paragraph, inlines)
    }

    pub fn container(kind: BlockKind, children: Vec<Block>) -> Self {
        Self {
            kind,
            content: BlockContent::Blocks(children),
        }
    }

    /// Inline content, or None for containers.
    pub fn inlines(&self) -> Option<&[Inline]> {
        match &self.content {
            BlockContent::Inlines(inlines) => Some(inlines),
            BlockContent::Blocks(_) => None,
        }
    }

    pub fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match &mut self.content {
            BlockContent::Inlines(inlines) => Some(inlines),
            BlockContent::Blocks(_) => None,
        }
    }

    /// Flat text length in chars (0 for containers).
    pub fn text_len(&self) -> usize {
        self.inlines().map(inlines_len).unwrap_or(0)
    }
}

/// The document: an ordered tree of blocks owned by the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Resolve a block path. The path must address blocks all the way down.
    pub fn block_at(&self, path: &[usize]) -> Option<&Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.children.get(*first)?;
        for &idx in rest {
            match &block.content {
                BlockContent::Blocks(children) => block = children.get(idx)?,
                BlockContent::Inlines(_) => return None,
            }
        }
        Some(block)
    }

    pub fn block_at_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.children.get_mut(*first)?;
        for &idx in rest {
            match &mut block.content {
                BlockContent::Blocks(children) => block = children.get_mut(idx)?,
                BlockContent::Inlines(_) => return None,
            }
        }
        Some(block)
    }

    /// Longest prefix of `path` that addresses a block: the nearest
    /// enclosing block of whatever node the full path points at.
    pub fn enclosing_block_path(&self, path: &[usize]) -> Option<NodePath> {
        let (first, rest) = path.split_first()?;
        let mut block = self.children.get(*first)?;
        let mut out = vec![*first];
        for &idx in rest {
            match &block.content {
                BlockContent::Blocks(children) => {
                    block = children.get(idx)?;
                    out.push(idx);
                }
                BlockContent::Inlines(_) => break,
            }
        }
        Some(out)
    }

    /// Resolve a full path to a text run, descending into link children.
    pub fn run_at(&self, path: &[usize]) -> Option<&TextRun> {
        let block_path = self.enclosing_block_path(path)?;
        let block = self.block_at(&block_path)?;
        let inlines = block.inlines()?;
        match &path[block_path.len()..] {
            [i] => match inlines.get(*i)? {
                Inline::Text(run) => Some(run),
                Inline::Link(_) => None,
            },
            [i, j] => match inlines.get(*i)? {
                Inline::Link(link) => match link.children.get(*j)? {
                    Inline::Text(run) => Some(run),
                    Inline::Link(_) => None,
                },
                Inline::Text(_) => None,
            },
            _ => None,
        }
    }

    /// First text position inside the block at `block_path`.
    ///
    /// Descends into a leading link; addresses the block itself when it has
    /// no inline content. None for containers.
    pub fn block_start_position(&self, block_path: &[usize]) -> Option<Position> {
        let block = self.block_at(block_path)?;
        let inlines = block.inlines()?;
        let mut path = block_path.to_vec();
        let mut current = inlines;
        loop {
            match current.first() {
                None => return Some(Position::new(path, 0)),
                Some(Inline::Text(_)) => {
                    path.push(0);
                    return Some(Position::new(path, 0));
                }
                Some(Inline::Link(link)) => {
                    path.push(0);
                    current = &link.children;
                }
            }
        }
    }

    /// Last text position inside the block at `block_path` (caret after the
    /// final char). None for containers.
    pub fn block_end_position(&self, block_path: &[usize]) -> Option<Position> {
        let block = self.block_at(block_path)?;
        let inlines = block.inlines()?;
        if inlines.is_empty() {
            return Some(Position::new(block_path.to_vec(), 0));
        }
        let flat = inlines_len(inlines);
        let (rel, offset) = rel_of_flat(inlines, flat)?;
        let mut path = block_path.to_vec();
        path.extend(rel);
        Some(Position::new(path, offset))
    }

    /// Compact one-line-per-block rendering for logs and the CLI.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for block in &self.children {
            write_block(&mut out, block, 0);
        }
        out
    }
}

fn write_block(out: &mut String, block: &Block, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(block.kind.name());
    match &block.content {
        BlockContent::Blocks(children) => {
            out.push('\n');
            for child in children {
                write_block(out, child, depth + 1);
            }
        }
        BlockContent::Inlines(inlines) => {
            out.push(':');
            write_inlines(out, inlines);
            out.push('\n');
        }
    }
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        out.push(' ');
        match inline {
            Inline::Text(run) => {
                out.push('"');
                out.push_str(&run.content);
                out.push('"');
                if !run.marks.is_empty() {
                    let mut names = Vec::new();
                    if run.marks.contains(MarkSet::BOLD) {
                        names.push("bold");
                    }
                    if run.marks.contains(MarkSet::ITALIC) {
                        names.push("italic");
                    }
                    if run.marks.contains(MarkSet::CODE) {
                        names.push("code");
                    }
                    out.push('(');
                    out.push_str(&names.join("+"));
                    out.push(')');
                }
            }
            Inline::Link(link) => {
                out.push('<');
                write_inlines(out, &link.children);
                out.push_str(" -> ");
                out.push_str(&link.url);
                out.push('>');
            }
        }
    }
}

// === Flat-offset helpers over inline lists ===

/// Total char length of an inline list.
pub fn inlines_len(inlines: &[Inline]) -> usize {
    inlines.iter().map(Inline::len).sum()
}

/// Byte index of the `idx`-th char of `s` (or `s.len()` when past the end).
fn char_to_byte(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map(|(b, _)| b).unwrap_or(s.len())
}

/// Flat offset of a block-relative position (`rel` path + char offset).
pub(crate) fn flat_of_rel(inlines: &[Inline], rel: &[usize], offset: usize) -> Option<usize> {
    let (first, rest) = rel.split_first()?;
    let mut acc = 0;
    for inline in inlines.iter().take(*first) {
        acc += inline.len();
    }
    match inlines.get(*first)? {
        Inline::Text(_) if rest.is_empty() => Some(acc + offset),
        Inline::Link(link) => Some(acc + flat_of_rel(&link.children, rest, offset)?),
        Inline::Text(_) => None,
    }
}

/// Block-relative position of a flat offset.
///
/// Offsets on a run boundary resolve into the earlier run (left affinity),
/// so a caret after the last char of a run stays inside that run.
pub(crate) fn rel_of_flat(inlines: &[Inline], flat: usize) -> Option<(NodePath, usize)> {
    let flat = flat.min(inlines_len(inlines));
    let mut acc = 0;
    for (i, inline) in inlines.iter().enumerate() {
        let hi = acc + inline.len();
        if flat <= hi {
            match inline {
                Inline::Text(_) => return Some((vec![i], flat - acc)),
                Inline::Link(link) => {
                    if let Some((mut rel, offset)) = rel_of_flat(&link.children, flat - acc) {
                        rel.insert(0, i);
                        return Some((rel, offset));
                    }
                    // empty link: fall through to the next inline
                }
            }
        }
        acc = hi;
    }
    None
}

/// Flat text of the span `range` (link children contribute their text).
pub(crate) fn text_of(inlines: &[Inline], range: CharSpan<usize>) -> String {
    let mut out = String::new();
    collect_text(inlines, range.start, range.end, &mut 0, &mut out);
    out
}

fn collect_text(inlines: &[Inline], a: usize, b: usize, acc: &mut usize, out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(run) => {
                let lo = *acc;
                let hi = lo + run.len();
                if b > lo && a < hi {
                    let from = a.clamp(lo, hi) - lo;
                    let to = b.clamp(lo, hi) - lo;
                    let bytes = char_to_byte(&run.content, from)..char_to_byte(&run.content, to);
                    out.push_str(&run.content[bytes]);
                }
                *acc = hi;
            }
            Inline::Link(link) => collect_text(&link.children, a, b, acc, out),
        }
    }
}

/// Split a run into (before, middle, after) at char offsets `a <= b`.
fn split3(run: TextRun, a: usize, b: usize) -> (Option<TextRun>, Option<TextRun>, Option<TextRun>) {
    let ba = char_to_byte(&run.content, a);
    let bb = char_to_byte(&run.content, b);
    let before = &run.content[..ba];
    let middle = &run.content[ba..bb];
    let after = &run.content[bb..];
    let make = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(TextRun::new(s, run.marks))
        }
    };
    (make(before), make(middle), make(after))
}

/// Insert `text` with `marks` at flat offset `at`.
///
/// Extends a run in place when the mark sets agree, otherwise splits the run
/// (or lands between inlines). Insertions at a link boundary go outside the
/// link; only a strictly interior offset descends into its children.
pub(crate) fn insert_chars(inlines: &mut Vec<Inline>, at: usize, text: &str, marks: MarkSet) {
    if text.is_empty() {
        return;
    }
    let at = at.min(inlines_len(inlines));

    // Find the first inline whose span covers `at` (left affinity).
    let mut target = None;
    let mut acc = 0;
    for (i, inline) in inlines.iter().enumerate() {
        let hi = acc + inline.len();
        if at <= hi {
            target = Some((i, acc, hi));
            break;
        }
        acc = hi;
    }
    let Some((i, lo, hi)) = target else {
        inlines.push(Inline::Text(TextRun::new(text, marks)));
        return;
    };

    let same_marks = matches!(&inlines[i], Inline::Text(run) if run.marks == marks);
    if same_marks {
        if let Inline::Text(run) = &mut inlines[i] {
            let byte = char_to_byte(&run.content, at - lo);
            run.content.insert_str(byte, text);
        }
        return;
    }

    if let Inline::Link(link) = &mut inlines[i] {
        if at > lo && at < hi {
            insert_chars(&mut link.children, at - lo, text, marks);
            return;
        }
        // link boundary: land outside
        let idx = if at == lo { i } else { i + 1 };
        inlines.insert(idx, Inline::Text(TextRun::new(text, marks)));
        return;
    }

    // Text run with a different mark set.
    if at == lo {
        inlines.insert(i, Inline::Text(TextRun::new(text, marks)));
    } else if at == hi {
        inlines.insert(i + 1, Inline::Text(TextRun::new(text, marks)));
    } else {
        let Inline::Text(run) = inlines.remove(i) else {
            unreachable!()
        };
        let (before, _, after) = split3(run, at - lo, at - lo);
        let mut idx = i;
        if let Some(before) = before {
            inlines.insert(idx, Inline::Text(before));
            idx += 1;
        }
        inlines.insert(idx, Inline::Text(TextRun::new(text, marks)));
        if let Some(after) = after {
            inlines.insert(idx + 1, Inline::Text(after));
        }
    }
}

/// Delete the flat span `range`, dropping emptied runs and links.
pub(crate) fn delete_chars(inlines: &mut Vec<Inline>, range: CharSpan<usize>) {
    if range.start >= range.end {
        return;
    }
    let mut acc = 0;
    let mut out = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        let len = inline.len();
        let lo = acc;
        let hi = acc + len;
        acc = hi;
        let from = range.start.clamp(lo, hi) - lo;
        let to = range.end.clamp(lo, hi) - lo;
        if from >= to {
            out.push(inline);
            continue;
        }
        match inline {
            Inline::Text(mut run) => {
                let bytes = char_to_byte(&run.content, from)..char_to_byte(&run.content, to);
                run.content.replace_range(bytes, "");
                if !run.content.is_empty() {
                    out.push(Inline::Text(run));
                }
            }
            Inline::Link(mut link) => {
                delete_chars(&mut link.children, from..to);
                if !link.children.is_empty() {
                    out.push(Inline::Link(link));
                }
            }
        }
    }
    *inlines = out;
}

/// OR `marks` into every run overlapping the flat span, splitting boundary
/// runs so exactly the span carries the new marks. Recurses into links.
pub(crate) fn mark_chars(inlines: &mut Vec<Inline>, range: CharSpan<usize>, marks: MarkSet) {
    if range.start >= range.end {
        return;
    }
    let mut acc = 0;
    let mut out = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        let len = inline.len();
        let lo = acc;
        let hi = acc + len;
        acc = hi;
        let from = range.start.clamp(lo, hi) - lo;
        let to = range.end.clamp(lo, hi) - lo;
        if from >= to {
            out.push(inline);
            continue;
        }
        match inline {
            Inline::Text(run) => {
                let (before, middle, after) = split3(run, from, to);
                if let Some(before) = before {
                    out.push(Inline::Text(before));
                }
                if let Some(mut middle) = middle {
                    middle.marks |= marks;
                    out.push(Inline::Text(middle));
                }
                if let Some(after) = after {
                    out.push(Inline::Text(after));
                }
            }
            Inline::Link(mut link) => {
                mark_chars(&mut link.children, from..to, marks);
                out.push(Inline::Link(link));
            }
        }
    }
    *inlines = out;
}

/// Wrap the flat span in a new link node carrying `url`.
///
/// Boundary runs are split; links overlapping the span contribute their
/// children (links never nest).
pub(crate) fn wrap_link_chars(inlines: &mut Vec<Inline>, range: CharSpan<usize>, url: SmolStr) {
    if range.start >= range.end {
        return;
    }
    let taken = std::mem::take(inlines);
    let (mut before, covered, after) = split_inlines(taken, range.start, range.end);
    if !covered.is_empty() {
        before.push(Inline::Link(Link {
            url,
            children: covered,
        }));
    }
    before.extend(after);
    *inlines = before;
}

/// Partition an inline list around the flat span `[a, b)`.
///
/// Links straddling a boundary split into link fragments on the outside;
/// the covered portion is flattened to its children.
fn split_inlines(inlines: Vec<Inline>, a: usize, b: usize) -> (Vec<Inline>, Vec<Inline>, Vec<Inline>) {
    let mut before = Vec::new();
    let mut covered = Vec::new();
    let mut after = Vec::new();
    let mut acc = 0;
    for inline in inlines {
        let len = inline.len();
        let lo = acc;
        let hi = acc + len;
        acc = hi;
        if hi <= a {
            before.push(inline);
            continue;
        }
        if lo >= b {
            after.push(inline);
            continue;
        }
        let from = a.clamp(lo, hi) - lo;
        let to = b.clamp(lo, hi) - lo;
        match inline {
            Inline::Text(run) => {
                let (run_before, run_mid, run_after) = split3(run, from, to);
                if let Some(run) = run_before {
                    before.push(Inline::Text(run));
                }
                if let Some(run) = run_mid {
                    covered.push(Inline::Text(run));
                }
                if let Some(run) = run_after {
                    after.push(Inline::Text(run));
                }
            }
            Inline::Link(link) => {
                let (link_before, link_mid, link_after) = split_inlines(link.children, from, to);
                if !link_before.is_empty() {
                    before.push(Inline::Link(Link {
                        url: link.url.clone(),
                        children: link_before,
                    }));
                }
                covered.extend(link_mid);
                if !link_after.is_empty() {
                    after.push(Inline::Link(Link {
                        url: link.url,
                        children: link_after,
                    }));
                }
            }
        }
    }
    (before, covered, after)
}

/// Drop empty runs/links and merge adjacent runs with equal marks.
///
/// Text content is preserved exactly, so flat offsets survive normalization.
pub(crate) fn normalize_inlines(inlines: &mut Vec<Inline>) {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());
    for mut inline in inlines.drain(..) {
        match &mut inline {
            Inline::Text(run) => {
                if run.content.is_empty() {
                    continue;
                }
            }
            Inline::Link(link) => {
                normalize_inlines(&mut link.children);
                if link.children.is_empty() {
                    continue;
                }
            }
        }
        let merged = if let (Some(Inline::Text(prev)), Inline::Text(run)) =
            (out.last_mut(), &inline)
        {
            if prev.marks == run.marks {
                prev.content.push_str(&run.content);
                true
            } else {
                false
            }
        } else {
            false
        };
        if !merged {
            out.push(inline);
        }
    }
    *inlines = out;
}
