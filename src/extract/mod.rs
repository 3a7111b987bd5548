//! Separates the token stream into code, documentation and ignorable tokens
//! and collects documentation fragments for assembly.

pub mod contamination;

use crate::syntax::{SyntaxTree, Token, TokenKind};

/// The three classes every token falls into, exactly one each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Code,
    Documentation,
    Ignorable,
}

/// Classify a token kind. The match is exhaustive over the closed kind set,
/// so a new kind cannot be added without deciding its class here.
pub fn classify(kind: TokenKind) -> NodeClass {
    match kind {
        TokenKind::Documentation => NodeClass::Documentation,
        TokenKind::Comment
        | TokenKind::Whitespace
        | TokenKind::Separator
        | TokenKind::EmbeddedData
        | TokenKind::EndMarker => NodeClass::Ignorable,
        TokenKind::Quote
        | TokenKind::QuoteLike
        | TokenKind::HereDoc
        | TokenKind::Word
        | TokenKind::Number
        | TokenKind::Variable
        | TokenKind::Operator
        | TokenKind::Structure => NodeClass::Code,
    }
}

/// The raw texts of all documentation tokens, in source order.
pub fn documentation_fragments(tree: &SyntaxTree) -> Vec<String> {
    tree.iter()
        .filter(|t| classify(t.kind) == NodeClass::Documentation)
        .map(|t| t.text.clone())
        .collect()
}

/// The code tokens of the tree, in source order.
pub fn code_tokens(tree: &SyntaxTree) -> impl Iterator<Item = &Token> {
    tree.iter().filter(|t| classify(t.kind) == NodeClass::Code)
}
