//! Shared syntax layer for tidyphp: lossless PHP tokens and the token-stream engine fixers are built on.
//!
//! The crate never builds a syntax tree. Fixers work on a flat [`TokenStream`] whose slots are addressed by stable
//! indices: analysis answers structural questions over that stream, rewrites tombstone or replace slots in place,
//! and [`TokenStream::generate_code`] serializes whatever is left.
//!
//! ## Notes
//! - This crate is intentionally “IO-free”: callers hand in source text and get source text back.
//! - Vocabulary identity (keywords/punctuation) comes from `tidyphp_core::lang` registries.
//!
//! ## Examples
//! ```rust,no_run
//! use tidyphp_syntax::{TokenStream, rewrite};
//!
//! let mut stream = TokenStream::from_code("<?php\n// drop me\necho 1;\n").unwrap();
//! rewrite::filter_comments(&mut stream, &["drop me"]);
//! assert_eq!(stream.generate_code(), "<?php\necho 1;\n");
//! ```

pub mod analyzer;
pub mod diagnostics;
pub mod lexer;
pub mod rewrite;
pub mod span;
pub mod stream;
pub mod token_helpers;

pub use analyzer::TokensAnalyzer;
pub use lexer::{Token, TokenKind};
pub use span::Span;
pub use stream::TokenStream;
