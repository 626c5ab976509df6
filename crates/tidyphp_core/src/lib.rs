//! Provide the canonical PHP vocabulary shared by the tidyphp lexer, analyzer and fixers.
//!
//! This crate is intentionally small and dependency-free. It answers questions like "is `FUNCTION` a reserved
//! word?" or "what is the spelling of `PunctuationId::NullsafeArrow`?" without knowing anything about tokens,
//! streams or files.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no syntax-tree types.
//! - PHP reserved words are case-insensitive; punctuation is not.

pub mod lang;
