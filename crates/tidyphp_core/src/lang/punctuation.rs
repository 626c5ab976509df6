//! Punctuation vocabulary.
//!
//! This module defines the structural, non-operator punctuation of PHP: delimiters, separators, member access
//! markers and attribute openers. Everything else the lexer meets (`=`, `.`, `??`, `<=>`, ...) is a plain operator.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This module is vocabulary only. It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use tidyphp_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("?->"), Some(PunctuationId::NullsafeArrow));
//! assert_eq!(punctuation::as_str(PunctuationId::LBrace), "{");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,` and `;`.
    Separator,
    /// Member/static access markers like `->` and `::`.
    Access,
    /// Misc markers like `=>`, `...`, `#[`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators
    Comma,
    Semicolon,
    Colon,

    // Access
    Arrow,
    NullsafeArrow,
    ColonColon,

    // Markers
    FatArrow,
    Ellipsis,
    AttributeStart,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
///
/// ## Notes
/// - Longer spellings come first inside each group so a greedy scanner can walk the table in order.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    // Separators
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    // Access
    info(PunctuationId::NullsafeArrow, "?->", PunctuationCategory::Access),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Access),
    info(PunctuationId::ColonColon, "::", PunctuationCategory::Access),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    // Markers
    info(PunctuationId::FatArrow, "=>", PunctuationCategory::Marker),
    info(PunctuationId::Ellipsis, "...", PunctuationCategory::Marker),
    info(PunctuationId::AttributeStart, "#[", PunctuationCategory::Marker),
    // Delimiters
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
];

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the closing delimiter paired with an opening one.
pub fn closing_pair(id: PunctuationId) -> Option<PunctuationId> {
    match id {
        PunctuationId::LParen => Some(PunctuationId::RParen),
        PunctuationId::LBracket => Some(PunctuationId::RBracket),
        PunctuationId::LBrace => Some(PunctuationId::RBrace),
        _ => None,
    }
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Resolve a punctuation spelling to its identifier.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Find the longest punctuation spelling that prefixes `input`.
///
/// ## Returns
/// - The identifier and the byte length of the matched spelling.
pub fn longest_prefix(input: &str) -> Option<(PunctuationId, usize)> {
    PUNCTUATION
        .iter()
        .filter(|p| input.starts_with(p.canonical))
        .max_by_key(|p| p.canonical.len())
        .map(|p| (p.id, p.canonical.len()))
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
    }
}
