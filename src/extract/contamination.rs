//! Detects documentation-looking text inside string and heredoc literals.
//!
//! The tokenizer works line by line, so a literal whose body contains a
//! line-start directive would have confused the original lexical pass that
//! this tool's extraction replaces. Extracting from such a file is ambiguous;
//! the whole file is rejected instead of producing a partial result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::syntax::{SyntaxTree, TokenKind};

/// A line beginning with the directive marker and a lowercase letter.
///
/// Deliberately conservative: any lowercase word after `=` counts, whether or
/// not it names a real directive, so coincidental text over-rejects rather
/// than slipping through.
static DIRECTIVE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^=[a-z]").expect("directive pattern is valid"));

/// True when any string-like token's literal content contains a directive
/// line. Short-circuits on the first hit; no side effects.
pub fn detect(tree: &SyntaxTree) -> bool {
    tree.iter()
        .filter(|t| {
            matches!(
                t.kind,
                TokenKind::Quote | TokenKind::QuoteLike | TokenKind::HereDoc
            )
        })
        .any(|t| {
            t.content
                .as_deref()
                .map_or(false, |body| DIRECTIVE_LINE.is_match(body))
        })
}
