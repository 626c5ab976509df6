//! PHP vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `PunctuationId`) and look up spellings/metadata via registry
//! tables instead of comparing raw strings all over the analyzer.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no token types, no IO, no side effects.
//! - The lexer decides *where* a word is a keyword (e.g. `$obj->class` is a name); registries only know spellings.
//!
//! ## Examples
//! ```rust
//! use tidyphp_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("Function"), Some(KeywordId::Function));
//! assert_eq!(keywords::as_str(KeywordId::Function), "function");
//! ```

pub mod keywords;
pub mod punctuation;
