//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy to work with
//! ID-based tokens.

use crate::lexer::{Token, TokenKind};
use tidyphp_core::lang::keywords::{self, KeywordId};
use tidyphp_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Return `true` for `//`, `#`, `/* */` and `/** */` comments.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Return `true` if this token carries no meaning for structure (whitespace or comment).
    pub fn is_trivia(&self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    /// Return `true` for member modifiers such as `public`, `static`, `abstract`.
    pub fn is_modifier(&self) -> bool {
        self.keyword_id().is_some_and(keywords::is_modifier)
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Return `true` for `//` and `#` comments, which end at a line break.
    pub fn is_single_line_comment(&self) -> bool {
        self.kind == TokenKind::Comment && !self.text.starts_with("/*")
    }

    /// Return `true` if this token can spell a name: plain names, and keywords used as method names
    /// (`function list()`).
    pub fn is_name_like(&self) -> bool {
        matches!(self.kind, TokenKind::Name | TokenKind::Keyword(_))
    }
}
