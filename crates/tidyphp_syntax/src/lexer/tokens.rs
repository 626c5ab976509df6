//! Token types for the PHP lexer.
//!
//! Every token keeps its exact source text, so a token list is a lossless rendition of the file: whitespace and
//! comments are tokens too.
//!
//! ## Notes
//! - Keyword and punctuation tokens carry stable IDs from `tidyphp_core::lang`; their `text` keeps the original
//!   spelling (`FUNCTION` stays upper-case on output).
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::span::Span;
use tidyphp_core::lang::keywords::{self, KeywordId};
use tidyphp_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========== Outside PHP mode ==========
    InlineHtml,
    OpenTag,  // <?php, <?=
    CloseTag, // ?>

    // ========== Trivia ==========
    Whitespace,
    Comment,    // //, #, /* */
    DocComment, // /** */

    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Names and literals ==========
    Name, // Foo, Foo\Bar, \Foo\Bar, namespace\Foo
    Variable,
    StringLiteral, // '...', "...", `...`
    Heredoc,       // <<<ID ... ID, <<<'ID' ... ID
    Number,

    // ========== Everything else ==========
    Operator,
}

/// A token with its kind, exact text and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Construct a token that does not come from the source (rewrites).
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, Span::synthetic())
    }

    /// Construct a keyword token with its canonical spelling.
    pub fn keyword(id: KeywordId) -> Self {
        Self::synthetic(TokenKind::Keyword(id), keywords::as_str(id))
    }

    /// Construct a punctuation token with its canonical spelling.
    pub fn punctuation(id: PunctuationId) -> Self {
        Self::synthetic(TokenKind::Punctuation(id), punctuation::as_str(id))
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
