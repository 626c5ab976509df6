//! Define the reserved keyword vocabulary for PHP.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, aliases and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive** (`FUNCTION`, `Function` and `function` are the same keyword).
//! - `true`, `false`, `null`, `self` and `parent` are *not* keywords here; PHP treats them as names.
//!
//! ## Examples
//! ```rust
//! use tidyphp_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("extends"), Some(KeywordId::Extends));
//! assert_eq!(keywords::from_str("die"), Some(KeywordId::Exit)); // alias
//! assert_eq!(keywords::from_str("AbstractMigration"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow
    If,
    Else,
    ElseIf,
    EndIf,
    While,
    EndWhile,
    Do,
    For,
    EndFor,
    Foreach,
    EndForeach,
    Switch,
    EndSwitch,
    Case,
    Default,
    Match,
    Break,
    Continue,
    Return,
    Yield,
    Goto,
    Try,
    Catch,
    Finally,
    Throw,
    Declare,
    EndDeclare,

    // Declarations
    Class,
    Interface,
    Trait,
    Enum,
    Function,
    Fn,
    Const,
    Extends,
    Implements,
    Namespace,
    Use,
    Insteadof,
    Global,
    Var,

    // Modifiers
    Abstract,
    Final,
    Public,
    Protected,
    Private,
    Static,
    Readonly,

    // Word operators
    And,
    Or,
    Xor,
    Instanceof,
    New,
    Clone,
    As,

    // Language constructs
    Echo,
    Print,
    Isset,
    Unset,
    Empty,
    Eval,
    Exit,
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
    List,
    Array,
    Callable,
}

/// High-level grouping for documentation and analyzer helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Declaration,
    Modifier,
    Operator,
    Construct,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Control flow
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::ElseIf, "elseif", KeywordCategory::ControlFlow),
    info(KeywordId::EndIf, "endif", KeywordCategory::ControlFlow),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
    info(KeywordId::EndWhile, "endwhile", KeywordCategory::ControlFlow),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow),
    info(KeywordId::EndFor, "endfor", KeywordCategory::ControlFlow),
    info(KeywordId::Foreach, "foreach", KeywordCategory::ControlFlow),
    info(KeywordId::EndForeach, "endforeach", KeywordCategory::ControlFlow),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow),
    info(KeywordId::EndSwitch, "endswitch", KeywordCategory::ControlFlow),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow),
    info(KeywordId::Match, "match", KeywordCategory::ControlFlow),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Yield, "yield", KeywordCategory::ControlFlow),
    info(KeywordId::Goto, "goto", KeywordCategory::ControlFlow),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow),
    info(KeywordId::Finally, "finally", KeywordCategory::ControlFlow),
    info(KeywordId::Throw, "throw", KeywordCategory::ControlFlow),
    info(KeywordId::Declare, "declare", KeywordCategory::ControlFlow),
    info(KeywordId::EndDeclare, "enddeclare", KeywordCategory::ControlFlow),
    // Declarations
    info(KeywordId::Class, "class", KeywordCategory::Declaration),
    info(KeywordId::Interface, "interface", KeywordCategory::Declaration),
    info(KeywordId::Trait, "trait", KeywordCategory::Declaration),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration),
    info(KeywordId::Function, "function", KeywordCategory::Declaration),
    info(KeywordId::Fn, "fn", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::Extends, "extends", KeywordCategory::Declaration),
    info(KeywordId::Implements, "implements", KeywordCategory::Declaration),
    info(KeywordId::Namespace, "namespace", KeywordCategory::Declaration),
    info(KeywordId::Use, "use", KeywordCategory::Declaration),
    info(KeywordId::Insteadof, "insteadof", KeywordCategory::Declaration),
    info(KeywordId::Global, "global", KeywordCategory::Declaration),
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    // Modifiers
    info(KeywordId::Abstract, "abstract", KeywordCategory::Modifier),
    info(KeywordId::Final, "final", KeywordCategory::Modifier),
    info(KeywordId::Public, "public", KeywordCategory::Modifier),
    info(KeywordId::Protected, "protected", KeywordCategory::Modifier),
    info(KeywordId::Private, "private", KeywordCategory::Modifier),
    info(KeywordId::Static, "static", KeywordCategory::Modifier),
    info(KeywordId::Readonly, "readonly", KeywordCategory::Modifier),
    // Word operators
    info(KeywordId::And, "and", KeywordCategory::Operator),
    info(KeywordId::Or, "or", KeywordCategory::Operator),
    info(KeywordId::Xor, "xor", KeywordCategory::Operator),
    info(KeywordId::Instanceof, "instanceof", KeywordCategory::Operator),
    info(KeywordId::New, "new", KeywordCategory::Operator),
    info(KeywordId::Clone, "clone", KeywordCategory::Operator),
    info(KeywordId::As, "as", KeywordCategory::Operator),
    // Language constructs
    info(KeywordId::Echo, "echo", KeywordCategory::Construct),
    info(KeywordId::Print, "print", KeywordCategory::Construct),
    info(KeywordId::Isset, "isset", KeywordCategory::Construct),
    info(KeywordId::Unset, "unset", KeywordCategory::Construct),
    info(KeywordId::Empty, "empty", KeywordCategory::Construct),
    info(KeywordId::Eval, "eval", KeywordCategory::Construct),
    info_with_aliases(KeywordId::Exit, "exit", &["die"], KeywordCategory::Construct),
    info(KeywordId::Include, "include", KeywordCategory::Construct),
    info(KeywordId::IncludeOnce, "include_once", KeywordCategory::Construct),
    info(KeywordId::Require, "require", KeywordCategory::Construct),
    info(KeywordId::RequireOnce, "require_once", KeywordCategory::Construct),
    info(KeywordId::List, "list", KeywordCategory::Construct),
    info(KeywordId::Array, "array", KeywordCategory::Construct),
    info(KeywordId::Callable, "callable", KeywordCategory::Construct),
];

/// Canonical (lower-case) spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Accepted alias spellings.
pub fn aliases(id: KeywordId) -> &'static [&'static str] {
    info_for(id).aliases
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Whether `id` is a member/class modifier (`public`, `static`, `final`, ...).
pub fn is_modifier(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Modifier
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling (canonical or alias).
///
/// ## Notes
/// - Matching is **case-insensitive**, like PHP itself.
pub fn from_str(s: &str) -> Option<KeywordId> {
    if let Some(k) = KEYWORDS.iter().find(|k| k.canonical.eq_ignore_ascii_case(s)) {
        return Some(k.id);
    }
    KEYWORDS
        .iter()
        .find(|k| k.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(s)))
        .map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases: &[],
        category,
    }
}

const fn info_with_aliases(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(from_str("CLASS"), Some(KeywordId::Class));
        assert_eq!(from_str("Class"), Some(KeywordId::Class));
        assert_eq!(from_str("include_once"), Some(KeywordId::IncludeOnce));
    }

    #[test]
    fn test_names_are_not_keywords() {
        for name in ["true", "null", "self", "parent", "getDescription"] {
            assert_eq!(from_str(name), None, "{name} should not be reserved");
        }
    }

    #[test]
    fn test_modifiers() {
        assert!(is_modifier(KeywordId::Public));
        assert!(is_modifier(KeywordId::Readonly));
        assert!(!is_modifier(KeywordId::Function));
    }

    #[test]
    fn test_alias_resolves_to_canonical() {
        assert_eq!(from_str("DIE"), Some(KeywordId::Exit));
        assert_eq!(as_str(KeywordId::Exit), "exit");
        assert_eq!(aliases(KeywordId::Exit), &["die"]);
    }
}
