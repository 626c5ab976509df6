#![forbid(unsafe_code)]
//! tidyphp: token-stream fixers for PHP sources.
//!
//! Sources are lexed losslessly into a [`TokenStream`], each enabled [`fixer::Fixer`] rewrites the stream in
//! priority order, and the stream is serialized back to text. Anything a fixer does not touch comes out byte for
//! byte as it went in.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a tidyphp bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod config;
pub mod describe;
pub mod fixer;
pub mod runner;

pub use config::{Config, ConfigError, DoctrineMigrationsConfig, RulesConfig};
pub use fixer::{DoctrineMigrationsFixer, Fixer, FixerDefinition, Priority, build_fixers};
pub use runner::{FixError, FixReport, fix_source, line_diff};
pub use tidyphp_syntax::TokenStream;
