//! Lexer diagnostics.
//!
//! Analysis and rewrites never fail; only turning source text into tokens can. Errors carry a [`Span`] so the CLI
//! can point at the offending construct through `miette`.

use miette::Diagnostic;
use thiserror::Error;

use crate::span::Span;

/// What went wrong while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedComment,
    UnterminatedHeredoc,
}

/// A lexing error with location information.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tidyphp::lex))]
pub struct LexError {
    pub message: String,
    pub kind: LexErrorKind,
    #[label("starts here")]
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        let message = match kind {
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
            LexErrorKind::UnterminatedHeredoc => "unterminated heredoc",
        };
        Self {
            message: message.to_string(),
            kind,
            span,
        }
    }
}
