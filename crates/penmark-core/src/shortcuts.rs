//! Shortcut tables and pattern resolution.
//!
//! Two static, ordered rule lists drive the engine: block rules match the
//! whole line prefix when a space is typed, inline rules match a delimiter
//! pair ending at the caret. First match wins, so the two-char bold
//! delimiters sit ahead of their one-char italic counterparts and `**x**`
//! can never resolve as italic.
//!
//! The built-in tables cover the usual markdown set; hosts can build their
//! own with [`BlockRule::new`]/[`InlineRule::new`], which validate the
//! pattern and its capture-group arity up front. Capture groups matter: the
//! interceptor's offset arithmetic runs on the exact captured lengths.

use std::sync::LazyLock;

use regex::Regex;
use smol_str::SmolStr;

use crate::types::{BlockKind, Mark};

/// Errors raised while building a custom shortcut table.
#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    #[error("invalid shortcut pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("pattern has {found} capture groups, expected {expected}")]
    CaptureCount { expected: usize, found: usize },
}

/// A block-level rule: line prefix -> block kind, plus a container kind for
/// list rules.
#[derive(Debug, Clone)]
pub struct BlockRule {
    pattern: Regex,
    pub produces: BlockKind,
    pub container: Option<BlockKind>,
}

impl BlockRule {
    /// Build a rule from an unanchored pattern. The pattern is anchored on
    /// both sides: the entire line prefix must match, trailing or leading
    /// extra characters disqualify.
    pub fn new(
        pattern: &str,
        produces: BlockKind,
        container: Option<BlockKind>,
    ) -> Result<Self, ShortcutError> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern,
            produces,
            container,
        })
    }

    pub fn matches(&self, prefix: &str) -> bool {
        self.pattern.is_match(prefix)
    }
}

/// What an inline rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Bold,
    Italic,
    Code,
    Link,
}

impl InlineKind {
    /// The mark this kind applies, None for links.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Self::Bold => Some(Mark::Bold),
            Self::Italic => Some(Mark::Italic),
            Self::Code => Some(Mark::Code),
            Self::Link => None,
        }
    }

    /// Capture groups the rule pattern must provide.
    fn expected_captures(self) -> usize {
        match self {
            Self::Link => 5,
            _ => 3,
        }
    }
}

/// An inline rule: a delimiter-pair pattern ending at the caret.
///
/// Emphasis/code patterns capture (open, inner, close); link patterns
/// capture (open bracket, text, middle marker, url, close paren).
#[derive(Debug, Clone)]
pub struct InlineRule {
    pattern: Regex,
    pub kind: InlineKind,
}

impl InlineRule {
    /// Build a rule from a pattern written without the end anchor; `$` is
    /// appended so the match always ends at the in-flight character.
    pub fn new(pattern: &str, kind: InlineKind) -> Result<Self, ShortcutError> {
        let pattern = Regex::new(&format!("{pattern}$"))?;
        let found = pattern.captures_len() - 1;
        let expected = kind.expected_captures();
        if found != expected {
            return Err(ShortcutError::CaptureCount { expected, found });
        }
        Ok(Self { pattern, kind })
    }
}

/// A resolved inline match with the captured group lengths (in chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineMatch {
    Emphasis {
        mark: Mark,
        open_len: usize,
        inner_len: usize,
        close_len: usize,
    },
    Link {
        open_len: usize,
        text_len: usize,
        middle_len: usize,
        url: SmolStr,
        close_len: usize,
    },
}

impl InlineMatch {
    pub fn kind(&self) -> InlineKind {
        match self {
            Self::Emphasis { mark, .. } => match mark {
                Mark::Bold => InlineKind::Bold,
                Mark::Italic => InlineKind::Italic,
                Mark::Code => InlineKind::Code,
            },
            Self::Link { .. } => InlineKind::Link,
        }
    }
}

/// The ordered block and inline rule lists.
#[derive(Debug, Clone)]
pub struct ShortcutTables {
    block: Vec<BlockRule>,
    inline: Vec<InlineRule>,
}

static BUILTIN: LazyLock<ShortcutTables> = LazyLock::new(ShortcutTables::standard);

impl Default for ShortcutTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl ShortcutTables {
    pub fn new(block: Vec<BlockRule>, inline: Vec<InlineRule>) -> Self {
        Self { block, inline }
    }

    /// The process-wide built-in tables.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// The standard markdown rule set.
    pub fn standard() -> Self {
        use BlockKind::*;
        let block = vec![
            BlockRule::new(r"[*+-]", ListItem, Some(BulletedList)).expect("builtin block rule"),
            BlockRule::new(r"\d+\.", ListItem, Some(NumberedList)).expect("builtin block rule"),
            BlockRule::new(r">", BlockQuote, None).expect("builtin block rule"),
            BlockRule::new(r"###", Heading3, None).expect("builtin block rule"),
            BlockRule::new(r"##", Heading2, None).expect("builtin block rule"),
            BlockRule::new(r"#", Heading1, None).expect("builtin block rule"),
        ];
        let inline = vec![
            InlineRule::new(r"(?:^|\s)(\*\*)([^*]+)(\*\*)", InlineKind::Bold)
                .expect("builtin inline rule"),
            InlineRule::new(r"(?:^|\s)(__)([^_]+)(__)", InlineKind::Bold)
                .expect("builtin inline rule"),
            InlineRule::new(r"(?:^|\s)(\*)([^*]+)(\*)", InlineKind::Italic)
                .expect("builtin inline rule"),
            InlineRule::new(r"(?:^|\s)(_)([^_]+)(_)", InlineKind::Italic)
                .expect("builtin inline rule"),
            InlineRule::new(r"(?:^|\s)(`)([^`]+)(`)", InlineKind::Code)
                .expect("builtin inline rule"),
            InlineRule::new(r"(\[)([^\[\]]+)(\]\()([^()]+)(\))", InlineKind::Link)
                .expect("builtin inline rule"),
        ];
        Self::new(block, inline)
    }

    /// First block rule matching the entire line prefix.
    pub fn resolve_block(&self, prefix: &str) -> Option<&BlockRule> {
        let rule = self.block.iter().find(|rule| rule.matches(prefix))?;
        tracing::debug!(prefix, kind = %rule.produces, "block rule matched");
        Some(rule)
    }

    /// First inline rule matching `candidate` (run text up to the caret plus
    /// the in-flight character), with its captured group lengths.
    pub fn resolve_inline(&self, candidate: &str) -> Option<InlineMatch> {
        for rule in &self.inline {
            let Some(caps) = rule.pattern.captures(candidate) else {
                continue;
            };
            let group_len = |i: usize| caps.get(i).map(|m| m.as_str().chars().count());
            let matched = match rule.kind.mark() {
                Some(mark) => InlineMatch::Emphasis {
                    mark,
                    open_len: group_len(1)?,
                    inner_len: group_len(2)?,
                    close_len: group_len(3)?,
                },
                None => InlineMatch::Link {
                    open_len: group_len(1)?,
                    text_len: group_len(2)?,
                    middle_len: group_len(3)?,
                    url: caps.get(4)?.as_str().into(),
                    close_len: group_len(5)?,
                },
            };
            tracing::debug!(candidate, kind = ?rule.kind, "inline rule matched");
            return Some(matched);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rules_match_exactly() {
        let tables = ShortcutTables::builtin();

        let rule = tables.resolve_block("-").unwrap();
        assert_eq!(rule.produces, BlockKind::ListItem);
        assert_eq!(rule.container, Some(BlockKind::BulletedList));

        assert_eq!(
            tables.resolve_block("#").unwrap().produces,
            BlockKind::Heading1
        );
        assert_eq!(
            tables.resolve_block("##").unwrap().produces,
            BlockKind::Heading2
        );
        assert_eq!(
            tables.resolve_block("###").unwrap().produces,
            BlockKind::Heading3
        );
        assert_eq!(
            tables.resolve_block(">").unwrap().produces,
            BlockKind::BlockQuote
        );

        // Trailing or leading extra characters disqualify.
        assert!(tables.resolve_block("# ").is_none());
        assert!(tables.resolve_block("x#").is_none());
        assert!(tables.resolve_block("####").is_none());
        assert!(tables.resolve_block("").is_none());
    }

    #[test]
    fn test_numbered_list_rule() {
        let tables = ShortcutTables::builtin();

        let rule = tables.resolve_block("1.").unwrap();
        assert_eq!(rule.produces, BlockKind::ListItem);
        assert_eq!(rule.container, Some(BlockKind::NumberedList));

        assert!(tables.resolve_block("12.").is_some());
        assert!(tables.resolve_block("1").is_none());
        assert!(tables.resolve_block(".").is_none());
    }

    #[test]
    fn test_bold_resolves_before_italic() {
        let tables = ShortcutTables::builtin();

        let m = tables.resolve_inline("**word**").unwrap();
        assert_eq!(m.kind(), InlineKind::Bold);
        assert_eq!(
            m,
            InlineMatch::Emphasis {
                mark: Mark::Bold,
                open_len: 2,
                inner_len: 4,
                close_len: 2,
            }
        );

        let m = tables.resolve_inline("__word__").unwrap();
        assert_eq!(m.kind(), InlineKind::Bold);
    }

    #[test]
    fn test_italic_and_code_rules() {
        let tables = ShortcutTables::builtin();

        let m = tables.resolve_inline("a *word*").unwrap();
        assert_eq!(m.kind(), InlineKind::Italic);

        let m = tables.resolve_inline("_word_").unwrap();
        assert_eq!(m.kind(), InlineKind::Italic);

        let m = tables.resolve_inline("see `code`").unwrap();
        assert_eq!(
            m,
            InlineMatch::Emphasis {
                mark: Mark::Code,
                open_len: 1,
                inner_len: 4,
                close_len: 1,
            }
        );
    }

    #[test]
    fn test_emphasis_requires_word_boundary() {
        let tables = ShortcutTables::builtin();

        // Word-internal underscores never resolve.
        assert!(tables.resolve_inline("snake_case_").is_none());
        // An open delimiter glued to the preceding word does not count.
        assert!(tables.resolve_inline("x*word*").is_none());
        // Incomplete close delimiter for bold.
        assert!(tables.resolve_inline("**word*").is_none());
    }

    #[test]
    fn test_match_must_end_at_caret() {
        let tables = ShortcutTables::builtin();

        // The pair closes before the candidate end: the in-flight character
        // is not part of any delimiter, so nothing fires.
        assert!(tables.resolve_inline("*word* x").is_none());
    }

    #[test]
    fn test_link_rule_captures_url() {
        let tables = ShortcutTables::builtin();

        let m = tables.resolve_inline("see [here](https://example.com)").unwrap();
        assert_eq!(
            m,
            InlineMatch::Link {
                open_len: 1,
                text_len: 4,
                middle_len: 2,
                url: "https://example.com".into(),
                close_len: 1,
            }
        );

        assert!(tables.resolve_inline("[here](").is_none());
        assert!(tables.resolve_inline("[](url)").is_none());
    }

    #[test]
    fn test_capture_lengths_are_chars_not_bytes() {
        let tables = ShortcutTables::builtin();

        let m = tables.resolve_inline("**héllo**").unwrap();
        assert_eq!(
            m,
            InlineMatch::Emphasis {
                mark: Mark::Bold,
                open_len: 2,
                inner_len: 5,
                close_len: 2,
            }
        );
    }

    #[test]
    fn test_custom_rule_validation() {
        assert!(matches!(
            BlockRule::new(r"[", BlockKind::Paragraph, None),
            Err(ShortcutError::Pattern(_))
        ));

        // Emphasis rules need exactly three capture groups.
        assert!(matches!(
            InlineRule::new(r"(~~)([^~]+)~~", InlineKind::Bold),
            Err(ShortcutError::CaptureCount {
                expected: 3,
                found: 2,
            })
        ));

        let rule = InlineRule::new(r"(?:^|\s)(~~)([^~]+)(~~)", InlineKind::Bold);
        assert!(rule.is_ok());
    }

    #[test]
    fn test_custom_table_order_is_respected() {
        // A table that lists italic before bold mis-reads `**x**`; build one
        // to confirm resolution is strictly first-match-wins.
        let tables = ShortcutTables::new(
            vec![],
            vec![
                InlineRule::new(r"(?:^|\s)(\*)([^*]+)(\*)", InlineKind::Italic).unwrap(),
                InlineRule::new(r"(?:^|\s)(\*\*)([^*]+)(\*\*)", InlineKind::Bold).unwrap(),
            ],
        );
        // `**x**` cannot match the italic pattern (inner excludes `*` and the
        // boundary check rejects the inner `*`), so even in the wrong order
        // bold still wins here...
        assert_eq!(
            tables.resolve_inline("**x**").unwrap().kind(),
            InlineKind::Bold
        );
        // ...but `*x*` resolves by whichever rule comes first.
        assert_eq!(
            tables.resolve_inline("*x*").unwrap().kind(),
            InlineKind::Italic
        );
    }
}
