//! Single-pass tokenizer for Perl-style source text.
//!
//! Purely lexical: no statement structure is recovered, only the token
//! stream the extraction pass needs. The scanner is hand-rolled because the
//! interesting constructs are context-sensitive: here-document bodies live
//! on the lines after their opener, quote-like operators carry one or two
//! delimited sections with nestable bracket delimiters, and pod blocks and
//! end markers are only recognized at the start of a line.

use std::path::PathBuf;

use crate::diagnostics::{ErrorContext, SourceContext, WeftError};

use super::{Span, SyntaxTree, Token, TokenKind};

/// Words that introduce a quote-like section when followed by a delimiter.
const QUOTELIKE_WORDS: &[&str] = &["m", "q", "qq", "qr", "qw", "qx", "s", "tr", "y"];

/// Words after which a `/` begins a match, not a division.
const REGEX_PRECEDING_WORDS: &[&str] = &[
    "and", "cmp", "eq", "ge", "grep", "gt", "if", "join", "le", "lt", "map", "ne", "not", "or",
    "print", "push", "return", "split", "unless", "until", "while", "x", "xor",
];

/// Multi-character operators, longest first so prefix matching is greedy.
const OPERATORS: &[&str] = &[
    "<=>", "**=", "||=", "&&=", "//=", "<<=", ">>=", "...", "=~", "!~", "->", "=>", "==", "!=",
    "<=", ">=", "++", "--", "**", "&&", "||", "//", "..", "+=", "-=", "*=", "/=", ".=", "%=",
    "|=", "&=", "^=", "<<", ">>",
];

/// Tokenize source text into a [`SyntaxTree`].
pub fn parse(text: &str, source: &SourceContext) -> Result<SyntaxTree, WeftError> {
    Lexer::new(text, source).run()
}

struct PendingHeredoc {
    token_index: usize,
    terminator: String,
    indented: bool,
    opener_span: Span,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    source: &'a SourceContext,
    tokens: Vec<Token>,
    pending_heredocs: Vec<PendingHeredoc>,
    /// True when the previous significant token can end an expression, which
    /// makes a following `/` a division rather than a match.
    last_operand: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, source: &'a SourceContext) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            source,
            tokens: Vec::new(),
            pending_heredocs: Vec::new(),
            last_operand: false,
        }
    }

    fn run(mut self) -> Result<SyntaxTree, WeftError> {
        while self.pos < self.bytes.len() {
            if self.at_line_start() {
                if !self.pending_heredocs.is_empty() {
                    self.collect_heredoc_bodies()?;
                    continue;
                }
                if self.at_pod_start() {
                    self.lex_pod();
                    continue;
                }
                if let Some(marker) = self.end_marker_ahead() {
                    self.lex_end_section(marker);
                    continue;
                }
            }
            let b = self.bytes[self.pos];
            match b {
                b'#' => self.lex_comment(),
                b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.lex_whitespace(),
                b';' => self.lex_separator(),
                b'\'' | b'"' => self.lex_quote(b)?,
                b'`' => self.lex_backtick()?,
                b'<' if self.heredoc_ahead() => self.lex_heredoc_opener()?,
                b'$' => self.lex_scalar_variable(),
                b'@' | b'%' | b'&' if self.sigil_starts_variable() => self.lex_variable(),
                b'0'..=b'9' => self.lex_number(),
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.lex_word()?,
                b'(' | b')' | b'[' | b']' | b'{' | b'}' => self.lex_structure(),
                b'/' if !self.last_operand => self.lex_match()?,
                _ if b >= 0x80 => self.lex_word()?,
                _ => self.lex_operator(),
            }
        }
        if let Some(pending) = self.pending_heredocs.first() {
            return Err(self.error(
                format!("unterminated here-document '{}'", pending.terminator),
                pending.opener_span,
            ));
        }
        Ok(SyntaxTree::new(self.tokens))
    }

    // ------------------------------------------------------------------
    // line-start constructs
    // ------------------------------------------------------------------

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.bytes[self.pos - 1] == b'\n'
    }

    fn at_pod_start(&self) -> bool {
        self.bytes[self.pos] == b'='
            && self
                .bytes
                .get(self.pos + 1)
                .map_or(false, |b| b.is_ascii_alphabetic())
    }

    /// A pod block runs from its opening directive line through the `=cut`
    /// line, or to end of file.
    fn lex_pod(&mut self) {
        let start = self.pos;
        loop {
            let line_start = self.pos;
            self.pos = self.line_end(self.pos);
            // A stray `=cut` opening the block is a one-line block of its own.
            if is_cut_line(&self.src[line_start..self.pos]) || self.pos >= self.bytes.len() {
                break;
            }
        }
        self.push_token(TokenKind::Documentation, start, None);
    }

    fn end_marker_ahead(&self) -> Option<&'static str> {
        for marker in ["__END__", "__DATA__"] {
            if self.src[self.pos..].starts_with(marker) {
                match self.bytes.get(self.pos + marker.len()) {
                    None | Some(b'\n') | Some(b'\r') | Some(b' ') | Some(b'\t') => {
                        return Some(marker)
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Everything after an end marker is embedded data, except that pod
    /// blocks in the trailing section are still real documentation.
    fn lex_end_section(&mut self, marker: &'static str) {
        let start = self.pos;
        self.pos += marker.len();
        self.push_token(TokenKind::EndMarker, start, None);
        self.last_operand = false;

        let mut data_start = self.pos;
        while self.pos < self.bytes.len() {
            if self.at_line_start() && self.at_pod_start() {
                if data_start < self.pos {
                    self.push_data(data_start);
                }
                self.lex_pod();
                data_start = self.pos;
            } else {
                self.pos = self.line_end(self.pos);
            }
        }
        if data_start < self.pos {
            self.push_data(data_start);
        }
    }

    fn push_data(&mut self, start: usize) {
        let span = Span {
            start,
            end: self.pos,
        };
        self.tokens.push(Token {
            kind: TokenKind::EmbeddedData,
            text: self.src[start..self.pos].to_string(),
            content: None,
            span,
        });
    }

    // ------------------------------------------------------------------
    // here-documents
    // ------------------------------------------------------------------

    fn heredoc_ahead(&self) -> bool {
        if self.bytes.get(self.pos + 1) != Some(&b'<') {
            return false;
        }
        let mut idx = self.pos + 2;
        if self.bytes.get(idx) == Some(&b'~') {
            idx += 1;
        }
        match self.bytes.get(idx) {
            Some(&b'"') | Some(&b'\'') => true,
            Some(&b) => is_ident_start(b),
            None => false,
        }
    }

    fn lex_heredoc_opener(&mut self) -> Result<(), WeftError> {
        let start = self.pos;
        self.pos += 2;
        let indented = self.bytes.get(self.pos) == Some(&b'~');
        if indented {
            self.pos += 1;
        }
        let terminator = match self.bytes.get(self.pos) {
            Some(&q) if q == b'"' || q == b'\'' => {
                self.pos += 1;
                let t_start = self.pos;
                while self.pos < self.bytes.len()
                    && self.bytes[self.pos] != q
                    && self.bytes[self.pos] != b'\n'
                {
                    self.pos += 1;
                }
                if self.bytes.get(self.pos) != Some(&q) {
                    return Err(self.error(
                        "malformed here-document terminator",
                        Span {
                            start,
                            end: self.pos,
                        },
                    ));
                }
                let t = self.src[t_start..self.pos].to_string();
                self.pos += 1;
                t
            }
            _ => {
                let t_start = self.pos;
                while self.pos < self.bytes.len() && is_ident_byte(self.bytes[self.pos]) {
                    self.pos += 1;
                }
                self.src[t_start..self.pos].to_string()
            }
        };
        let opener_span = Span {
            start,
            end: self.pos,
        };
        self.push_token(TokenKind::HereDoc, start, None);
        self.pending_heredocs.push(PendingHeredoc {
            token_index: self.tokens.len() - 1,
            terminator,
            indented,
            opener_span,
        });
        self.last_operand = true;
        Ok(())
    }

    /// Attach body lines to every heredoc opened on the previous line, in
    /// opener order. The terminator line is consumed but not part of the
    /// body.
    fn collect_heredoc_bodies(&mut self) -> Result<(), WeftError> {
        let pending = std::mem::take(&mut self.pending_heredocs);
        for heredoc in pending {
            let body_start = self.pos;
            let mut body_end = None;
            while self.pos < self.bytes.len() {
                let line_start = self.pos;
                let line_end = self.line_end(self.pos);
                let line = &self.src[line_start..line_end];
                let stripped = line.strip_suffix('\n').unwrap_or(line);
                let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);
                let candidate = if heredoc.indented {
                    stripped.trim_start_matches(|c| c == ' ' || c == '\t')
                } else {
                    stripped
                };
                self.pos = line_end;
                if candidate == heredoc.terminator {
                    body_end = Some(line_start);
                    break;
                }
            }
            let body_end = body_end.ok_or_else(|| {
                self.error(
                    format!("unterminated here-document '{}'", heredoc.terminator),
                    heredoc.opener_span,
                )
            })?;
            self.tokens[heredoc.token_index].content =
                Some(self.src[body_start..body_end].to_string());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // strings and quote-like operators
    // ------------------------------------------------------------------

    fn lex_quote(&mut self, delim: u8) -> Result<(), WeftError> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        self.consume_until_unescaped(delim)
            .map_err(|span| self.error("unterminated string literal", span))?;
        let content = self.src[content_start..self.pos - 1].to_string();
        self.push_token(TokenKind::Quote, start, Some(content));
        self.last_operand = true;
        Ok(())
    }

    fn lex_backtick(&mut self) -> Result<(), WeftError> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        self.consume_until_unescaped(b'`')
            .map_err(|span| self.error("unterminated command literal", span))?;
        let content = self.src[content_start..self.pos - 1].to_string();
        self.push_token(TokenKind::QuoteLike, start, Some(content));
        self.last_operand = true;
        Ok(())
    }

    fn lex_match(&mut self) -> Result<(), WeftError> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        self.consume_until_unescaped(b'/')
            .map_err(|span| self.error("unterminated match", span))?;
        let content = self.src[content_start..self.pos - 1].to_string();
        self.consume_flags();
        self.push_token(TokenKind::QuoteLike, start, Some(content));
        self.last_operand = true;
        Ok(())
    }

    fn lex_quotelike(&mut self, start: usize, word: &str) -> Result<(), WeftError> {
        let parts = if matches!(word, "s" | "tr" | "y") { 2 } else { 1 };
        let kind = if matches!(word, "q" | "qq") {
            TokenKind::Quote
        } else {
            TokenKind::QuoteLike
        };
        let open = self.bytes[self.pos];
        let close = closing_delimiter(open);
        self.pos += 1;
        let content_start = self.pos;
        self.consume_section(open, close)
            .map_err(|span| self.error(format!("unterminated {} section", word), span))?;
        if parts == 2 {
            if open != close {
                // Bracketed forms take a fresh delimiter for the second
                // section, optionally after whitespace.
                while matches!(
                    self.bytes.get(self.pos),
                    Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
                ) {
                    self.pos += 1;
                }
                let open2 = match self.bytes.get(self.pos) {
                    Some(&b) if b.is_ascii_punctuation() => b,
                    _ => {
                        return Err(self.error(
                            format!("malformed {} replacement section", word),
                            Span {
                                start,
                                end: self.pos,
                            },
                        ))
                    }
                };
                self.pos += 1;
                self.consume_section(open2, closing_delimiter(open2))
                    .map_err(|span| {
                        self.error(format!("unterminated {} section", word), span)
                    })?;
            } else {
                self.consume_until_unescaped(close)
                    .map_err(|span| self.error(format!("unterminated {} section", word), span))?;
            }
        }
        let content = self.src[content_start..self.pos - 1].to_string();
        self.consume_flags();
        self.push_token(kind, start, Some(content));
        self.last_operand = true;
        Ok(())
    }

    /// Consume one delimited section, honoring backslash escapes and, for
    /// bracket pairs, nesting. `pos` must sit just past the opening
    /// delimiter; on success it sits just past the closing one.
    fn consume_section(&mut self, open: u8, close: u8) -> Result<(), Span> {
        let start = self.pos;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
                continue;
            }
            if open != close && b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    self.pos += 1;
                    return Ok(());
                }
            }
            self.pos += 1;
        }
        Err(Span {
            start: start.saturating_sub(1),
            end: self.pos,
        })
    }

    fn consume_until_unescaped(&mut self, close: u8) -> Result<(), Span> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
                continue;
            }
            self.pos += 1;
            if b == close {
                return Ok(());
            }
        }
        Err(Span {
            start: start.saturating_sub(1),
            end: self.pos,
        })
    }

    fn consume_flags(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .map_or(false, |b| b.is_ascii_alphabetic())
        {
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------
    // plain tokens
    // ------------------------------------------------------------------

    fn lex_comment(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
        self.push_token(TokenKind::Comment, start, None);
    }

    fn lex_whitespace(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if !matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c) {
                break;
            }
            self.pos += 1;
            // Heredoc bodies begin on the next line; stop there so the main
            // loop can collect them.
            if b == b'\n' && !self.pending_heredocs.is_empty() {
                break;
            }
        }
        self.push_token(TokenKind::Whitespace, start, None);
    }

    fn lex_separator(&mut self) {
        let start = self.pos;
        self.pos += 1;
        self.push_token(TokenKind::Separator, start, None);
        self.last_operand = false;
    }

    fn lex_structure(&mut self) {
        let start = self.pos;
        let b = self.bytes[self.pos];
        self.pos += 1;
        self.push_token(TokenKind::Structure, start, None);
        self.last_operand = matches!(b, b')' | b']' | b'}');
    }

    fn lex_scalar_variable(&mut self) {
        let start = self.pos;
        self.pos += 1;
        if self.bytes.get(self.pos) == Some(&b'#') {
            self.pos += 1;
        }
        while self.bytes.get(self.pos) == Some(&b'$') {
            self.pos += 1;
        }
        if self
            .bytes
            .get(self.pos)
            .map_or(false, |b| is_ident_start(*b))
        {
            self.consume_identifier();
        } else if self.pos == start + 1 {
            // Punctuation variables like $@, $!, $/.
            match self.bytes.get(self.pos) {
                Some(&b) if b.is_ascii_graphic() && b != b'{' => self.pos += 1,
                _ => {
                    self.push_token(TokenKind::Operator, start, None);
                    self.last_operand = false;
                    return;
                }
            }
        }
        self.push_token(TokenKind::Variable, start, None);
        self.last_operand = true;
    }

    fn sigil_starts_variable(&self) -> bool {
        matches!(
            self.bytes.get(self.pos + 1),
            Some(&b) if is_ident_start(b) || b == b'$'
        )
    }

    fn lex_variable(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.bytes.get(self.pos) == Some(&b'$') {
            self.pos += 1;
        }
        if self
            .bytes
            .get(self.pos)
            .map_or(false, |b| is_ident_start(*b))
        {
            self.consume_identifier();
        }
        self.push_token(TokenKind::Variable, start, None);
        self.last_operand = true;
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
                if (b == b'e' || b == b'E')
                    && !self.src[start..].starts_with("0x")
                    && !self.src[start..].starts_with("0X")
                    && matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-'))
                    && self
                        .bytes
                        .get(self.pos + 1)
                        .map_or(false, |d| d.is_ascii_digit())
                {
                    self.pos += 1;
                }
            } else if b == b'.'
                && self
                    .bytes
                    .get(self.pos + 1)
                    .map_or(false, |d| d.is_ascii_digit())
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.push_token(TokenKind::Number, start, None);
        self.last_operand = true;
    }

    fn lex_word(&mut self) -> Result<(), WeftError> {
        let start = self.pos;
        self.consume_identifier();
        let word = &self.src[start..self.pos];
        if QUOTELIKE_WORDS.contains(&word) && self.quotelike_delimiter_ahead() {
            let word = word.to_string();
            return self.lex_quotelike(start, &word);
        }
        let is_operand = !REGEX_PRECEDING_WORDS.contains(&word);
        self.push_token(TokenKind::Word, start, None);
        self.last_operand = is_operand;
        Ok(())
    }

    /// True when the byte at `pos` can open a quote-like section. Sigils,
    /// commas, fat commas and closing brackets are excluded so that hash
    /// keys (`m => 1`) and adjacent expressions keep their meaning.
    fn quotelike_delimiter_ahead(&self) -> bool {
        match self.bytes.get(self.pos) {
            Some(&b) if b.is_ascii_punctuation() => !matches!(
                b,
                b',' | b';' | b'=' | b')' | b'}' | b']' | b'>' | b'$' | b'@' | b'%' | b'&'
            ),
            _ => false,
        }
    }

    fn lex_operator(&mut self) {
        let start = self.pos;
        let rest = &self.src[self.pos..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.pos += op.len();
        } else {
            self.pos += 1;
        }
        self.push_token(TokenKind::Operator, start, None);
        self.last_operand = false;
    }

    // ------------------------------------------------------------------
    // shared plumbing
    // ------------------------------------------------------------------

    fn consume_identifier(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
                self.pos += 1;
            } else if b == b':'
                && self.bytes.get(self.pos + 1) == Some(&b':')
                && self
                    .bytes
                    .get(self.pos + 2)
                    .map_or(false, |c| is_ident_start(*c))
            {
                self.pos += 2;
            } else {
                break;
            }
        }
    }

    /// Index just past the next line break, or end of input.
    fn line_end(&self, from: usize) -> usize {
        match self.bytes[from..].iter().position(|b| *b == b'\n') {
            Some(i) => from + i + 1,
            None => self.bytes.len(),
        }
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, content: Option<String>) {
        let span = Span {
            start,
            end: self.pos,
        };
        self.tokens.push(Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            content,
            span,
        });
    }

    fn error(&self, message: impl Into<String>, span: Span) -> WeftError {
        WeftError::Parse {
            message: message.into(),
            path: PathBuf::from(&self.source.name),
            ctx: ErrorContext::with_source_and_span(self.source.to_named_source(), span),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn closing_delimiter(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        b'<' => b'>',
        other => other,
    }
}

/// An `=cut` line ends a pod block; the directive name must end at a word
/// boundary so `=cutting` stays inside the block.
fn is_cut_line(line: &str) -> bool {
    match line.strip_prefix("=cut") {
        Some(rest) => !rest.as_bytes().first().map_or(false, |b| is_ident_byte(*b)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> SyntaxTree {
        parse(src, &SourceContext::from_file("test.pm", src)).expect("source should tokenize")
    }

    fn kinds(tree: &SyntaxTree) -> Vec<TokenKind> {
        tree.iter().map(|t| t.kind).collect()
    }

    fn docs(tree: &SyntaxTree) -> Vec<&str> {
        tree.iter()
            .filter(|t| t.kind == TokenKind::Documentation)
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn plain_statement() {
        let tree = lex("my $x = 42;\n");
        assert_eq!(
            kinds(&tree),
            vec![
                TokenKind::Word,
                TokenKind::Whitespace,
                TokenKind::Variable,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Separator,
                TokenKind::Whitespace,
            ]
        );
    }

    #[test]
    fn pod_block_runs_through_cut() {
        let src = "my $x = 1;\n=head1 NAME\n\nFoo\n\n=cut\nmy $y = 2;\n";
        let tree = lex(src);
        let blocks = docs(&tree);
        assert_eq!(blocks, vec!["=head1 NAME\n\nFoo\n\n=cut\n"]);
    }

    #[test]
    fn pod_block_without_cut_runs_to_eof() {
        let tree = lex("=head1 NAME\n\nno terminator here\n");
        assert_eq!(docs(&tree).len(), 1);
        assert!(docs(&tree)[0].ends_with("here\n"));
    }

    #[test]
    fn cutting_does_not_end_a_block() {
        let src = "=head1 X\n=cutting along\n=cut\n";
        let tree = lex(src);
        assert_eq!(docs(&tree), vec![src]);
    }

    #[test]
    fn indented_directive_is_not_pod() {
        let tree = lex("  =head1 not pod\n");
        assert!(docs(&tree).is_empty());
    }

    #[test]
    fn heredoc_body_is_attached_to_opener() {
        let src = "my $x = <<EOF;\nline one\nline two\nEOF\nmy $y = 1;\n";
        let tree = lex(src);
        let heredoc = tree
            .iter()
            .find(|t| t.kind == TokenKind::HereDoc)
            .expect("heredoc token");
        assert_eq!(heredoc.text, "<<EOF");
        assert_eq!(heredoc.content.as_deref(), Some("line one\nline two\n"));
        // The statement after the body is still tokenized.
        assert!(tree
            .iter()
            .any(|t| t.kind == TokenKind::Variable && t.text == "$y"));
    }

    #[test]
    fn stacked_heredocs_fill_in_opener_order() {
        let src = "print <<A, <<'B';\nfirst\nA\nsecond\nB\n";
        let tree = lex(src);
        let bodies: Vec<_> = tree
            .iter()
            .filter(|t| t.kind == TokenKind::HereDoc)
            .map(|t| t.content.as_deref().unwrap())
            .collect();
        assert_eq!(bodies, vec!["first\n", "second\n"]);
    }

    #[test]
    fn indented_heredoc_matches_indented_terminator() {
        let src = "my $x = <<~EOF;\n  body\n  EOF\n";
        let tree = lex(src);
        let heredoc = tree
            .iter()
            .find(|t| t.kind == TokenKind::HereDoc)
            .expect("heredoc token");
        assert_eq!(heredoc.content.as_deref(), Some("  body\n"));
    }

    #[test]
    fn unterminated_heredoc_is_a_parse_error() {
        let err = parse(
            "my $x = <<EOF;\nno terminator\n",
            &SourceContext::from_file("test.pm", ""),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), crate::diagnostics::ErrorType::Parse);
    }

    #[test]
    fn quote_content_excludes_delimiters() {
        let tree = lex("my $s = 'hello world';\n");
        let quote = tree
            .iter()
            .find(|t| t.kind == TokenKind::Quote)
            .expect("quote token");
        assert_eq!(quote.content.as_deref(), Some("hello world"));
        assert_eq!(quote.text, "'hello world'");
    }

    #[test]
    fn escaped_delimiter_does_not_close() {
        let tree = lex("my $s = \"a \\\" b\";\n");
        let quote = tree
            .iter()
            .find(|t| t.kind == TokenKind::Quote)
            .expect("quote token");
        assert_eq!(quote.content.as_deref(), Some("a \\\" b"));
    }

    #[test]
    fn unterminated_string_is_a_parse_error() {
        let err = parse("my $s = 'oops", &SourceContext::from_file("test.pm", "")).unwrap_err();
        assert_eq!(err.error_type(), crate::diagnostics::ErrorType::Parse);
    }

    #[test]
    fn quotelike_operators_capture_their_sections() {
        let tree = lex("my @w = qw(alpha beta);\nmy $r = s{old}{new}g;\n");
        let quotelike: Vec<_> = tree
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::QuoteLike))
            .collect();
        assert_eq!(quotelike.len(), 2);
        assert_eq!(quotelike[0].content.as_deref(), Some("alpha beta"));
        assert_eq!(quotelike[1].content.as_deref(), Some("old}{new"));
    }

    #[test]
    fn fat_comma_keeps_quotelike_words_plain() {
        let tree = lex("my %h = (m => 1, s => 2);\n");
        assert!(tree.iter().all(|t| t.kind != TokenKind::QuoteLike));
    }

    #[test]
    fn slash_after_operand_is_division() {
        let tree = lex("my $x = $y / 2;\n");
        assert!(tree.iter().all(|t| t.kind != TokenKind::QuoteLike));
    }

    #[test]
    fn slash_in_condition_is_a_match() {
        let tree = lex("return /pattern/;\n");
        let m = tree
            .iter()
            .find(|t| t.kind == TokenKind::QuoteLike)
            .expect("match token");
        assert_eq!(m.content.as_deref(), Some("pattern"));
    }

    #[test]
    fn end_marker_splits_data_and_pod() {
        let src = "my $x = 1;\n__END__\nraw data\n=head1 TRAILING\n\ndocs\n\n=cut\nmore data\n";
        let tree = lex(src);
        assert!(tree.iter().any(|t| t.kind == TokenKind::EndMarker));
        assert_eq!(
            tree.iter()
                .filter(|t| t.kind == TokenKind::EmbeddedData)
                .count(),
            2
        );
        assert_eq!(docs(&tree), vec!["=head1 TRAILING\n\ndocs\n\n=cut\n"]);
    }

    #[test]
    fn comment_stops_before_newline() {
        let tree = lex("# leading comment\nmy $x;\n");
        let comment = tree
            .iter()
            .find(|t| t.kind == TokenKind::Comment)
            .expect("comment token");
        assert_eq!(comment.text, "# leading comment");
    }

    #[test]
    fn token_spans_are_ordered() {
        let src = "package Foo;\n=head1 A\n\n=cut\nmy $x = <<EOF;\nbody\nEOF\n1;\n";
        let tree = lex(src);
        assert_eq!(tree.tokens()[0].span.start, 0);
        let mut last_start = 0;
        for token in tree.iter() {
            assert!(token.span.start >= last_start);
            last_start = token.span.start;
        }
    }
}
