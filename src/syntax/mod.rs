//! Syntax tree produced by tokenizing a source file.
//!
//! The tree is an ordered sequence of typed tokens; token order equals source
//! order, which is what the extraction pass depends on. The set of token
//! kinds is closed so that downstream classification is exhaustive by
//! construction.

pub mod lexer;

pub use lexer::parse;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// The closed set of token kinds the tokenizer can produce.
///
/// `Quote`, `QuoteLike` and `HereDoc` are string-like: their tokens carry the
/// delimiter-free literal body in [`Token::content`]. Everything from `Word`
/// down is plain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A `#` comment, up to but not including the line break.
    Comment,
    /// An embedded pod block, from its opening directive line through the
    /// terminating `=cut` line (or end of file).
    Documentation,
    Whitespace,
    /// The `;` statement separator.
    Separator,
    /// Raw trailing data following an end marker.
    EmbeddedData,
    /// `__END__` or `__DATA__` at the start of a line.
    EndMarker,
    /// A plain string literal: `'..'`, `".."`, `q{..}`, `qq{..}`.
    Quote,
    /// A string-like operator: backticks, `qw`, `qx`, match, substitution,
    /// transliteration.
    QuoteLike,
    /// A here-document opener; the body lines are attached as content.
    HereDoc,
    Word,
    Number,
    /// A sigiled identifier (`$x`, `@x`, `%x`, `&x`).
    Variable,
    Operator,
    /// A single bracketing character: `( ) [ ] { }`.
    Structure,
}

/// One token of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim source text of the token. For here-documents this is the
    /// opener; the body lives in `content`.
    pub text: String,
    /// Literal body for string-like tokens, without delimiters and without
    /// unescaping. `None` for every other kind.
    pub content: Option<String>,
    pub span: Span,
}

/// An ordered, parsed view of one source file.
///
/// Read-only after construction; owned by a single file's pipeline run.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    tokens: Vec<Token>,
}

impl SyntaxTree {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The name declared by the first `package` statement, if any.
    pub fn package_name(&self) -> Option<String> {
        let mut significant = self
            .tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Comment));
        while let Some(token) = significant.next() {
            if token.kind == TokenKind::Word && token.text == "package" {
                return match significant.next() {
                    Some(next) if next.kind == TokenKind::Word => Some(next.text.clone()),
                    _ => None,
                };
            }
        }
        None
    }

    /// The text of an `# ABSTRACT: ...` comment, if the file carries one.
    pub fn abstract_comment(&self) -> Option<String> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .find_map(|t| {
                let stripped = t.text.trim_start_matches('#').trim_start();
                let rest = stripped.strip_prefix("ABSTRACT:")?;
                let rest = rest.trim();
                if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                }
            })
    }
}

impl<'a> IntoIterator for &'a SyntaxTree {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SourceContext;

    fn tree(src: &str) -> SyntaxTree {
        parse(src, &SourceContext::from_file("test.pm", src)).expect("source should tokenize")
    }

    #[test]
    fn package_name_is_found() {
        let t = tree("package Foo::Bar;\nmy $x = 1;\n");
        assert_eq!(t.package_name().as_deref(), Some("Foo::Bar"));
    }

    #[test]
    fn package_name_absent_for_plain_script() {
        let t = tree("my $x = 1;\n");
        assert_eq!(t.package_name(), None);
    }

    #[test]
    fn abstract_comment_is_found() {
        let t = tree("package Foo;\n# ABSTRACT: a fine module\n1;\n");
        assert_eq!(t.abstract_comment().as_deref(), Some("a fine module"));
    }

    #[test]
    fn abstract_requires_marker() {
        let t = tree("# just a comment\n1;\n");
        assert_eq!(t.abstract_comment(), None);
    }
}
