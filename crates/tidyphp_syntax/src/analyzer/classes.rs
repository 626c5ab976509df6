//! Class declarations with their `extends`/`implements` clauses, and name resolution through the namespace and
//! `use` imports in scope.

use super::elements::{ElementKind, StructuralElement, find_block_end, find_elements};
use crate::lexer::TokenKind;
use crate::stream::TokenStream;
use std::collections::HashMap;
use tidyphp_core::lang::keywords::KeywordId;
use tidyphp_core::lang::punctuation::PunctuationId;

/// Class-like imports of one namespace scope, keyed by lowercased alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    by_alias: HashMap<String, String>,
}

impl ImportMap {
    pub fn insert(&mut self, alias: &str, fully_qualified: &str) {
        self.by_alias
            .insert(alias.to_ascii_lowercase(), fully_qualified.trim_start_matches('\\').to_string());
    }

    /// Fully-qualified name imported under `alias`.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.by_alias.get(&alias.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

/// A `class` declaration and the names it derives from, as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub element: StructuralElement,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub namespace: Option<String>,
    pub imports: ImportMap,
}

impl ClassDeclaration {
    /// Parent class and interfaces, as written.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.extends.iter().chain(&self.implements).map(String::as_str)
    }

    /// Resolve a written class name to a fully-qualified one (without leading `\`).
    ///
    /// `\Foo` is already qualified; otherwise the first segment is looked up in the imports, and failing that the
    /// name is taken relative to the current namespace.
    pub fn resolve(&self, written: &str) -> String {
        if let Some(qualified) = written.strip_prefix('\\') {
            return qualified.to_string();
        }
        let (head, tail) = match written.split_once('\\') {
            Some((head, tail)) => (head, Some(tail)),
            None => (written, None),
        };
        if let Some(imported) = self.imports.get(head) {
            return match tail {
                Some(tail) => format!("{imported}\\{tail}"),
                None => imported.to_string(),
            };
        }
        match &self.namespace {
            Some(namespace) => format!("{namespace}\\{written}"),
            None => written.to_string(),
        }
    }

    /// Whether this class extends or implements `target`.
    ///
    /// Names compare ASCII case-insensitively and ignore a leading `\`. A supertype written relative to an unknown
    /// scope (not fully qualified, first segment not imported) also matches when `target` ends with it at a
    /// namespace boundary.
    pub fn derives_from(&self, target: &str) -> bool {
        let target = target.trim().trim_start_matches('\\');
        if target.is_empty() {
            return false;
        }

        self.supertypes().any(|written| {
            if self.resolve(written).eq_ignore_ascii_case(target) {
                return true;
            }
            let bare = written.trim_start_matches('\\');
            if bare.eq_ignore_ascii_case(target) {
                return true;
            }
            let head = bare.split('\\').next().unwrap_or(bare);
            if written.starts_with('\\') || self.imports.get(head).is_some() {
                return false;
            }
            ends_with_segment(target, bare)
        })
    }
}

/// `target` ends with `\suffix`, compared ASCII case-insensitively.
fn ends_with_segment(target: &str, suffix: &str) -> bool {
    let Some(split) = target.len().checked_sub(suffix.len() + 1) else {
        return false;
    };
    target.is_char_boundary(split)
        && target[split..].starts_with('\\')
        && target[split + 1..].eq_ignore_ascii_case(suffix)
}

/// Namespace and imports in effect at some position.
#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: Option<String>,
    imports: ImportMap,
}

/// Every named or anonymous `class` in the stream, with its scope.
#[tracing::instrument(skip_all)]
pub fn find_class_declarations(stream: &TokenStream) -> Vec<ClassDeclaration> {
    let elements = find_elements(stream);
    let classy_bodies: Vec<(usize, usize)> = elements
        .iter()
        .filter(|e| e.kind.is_classy())
        .filter_map(|e| e.body)
        .collect();

    elements
        .into_iter()
        .filter(|e| e.kind == ElementKind::Class)
        .map(|element| {
            let scope = scope_at(stream, element.start, &classy_bodies);
            let (extends, implements) = supertype_clauses(stream, &element);
            ClassDeclaration {
                element,
                extends,
                implements,
                namespace: scope.namespace,
                imports: scope.imports,
            }
        })
        .collect()
}

/// Whether any class in the stream extends or implements one of `names`.
pub fn is_class_derived_from<S: AsRef<str>>(stream: &TokenStream, names: &[S]) -> bool {
    find_class_declarations(stream)
        .iter()
        .any(|class| names.iter().any(|name| class.derives_from(name.as_ref())))
}

fn supertype_clauses(stream: &TokenStream, element: &StructuralElement) -> (Option<String>, Vec<String>) {
    #[derive(PartialEq)]
    enum Clause {
        None,
        Extends,
        Implements,
    }

    let Some((open, _)) = element.body else {
        return (None, Vec::new());
    };

    let mut clause = Clause::None;
    let mut extends = None;
    let mut implements = Vec::new();
    let mut cursor = element.start;
    while let Some(index) = stream.next_meaningful(cursor).filter(|&i| i < open) {
        cursor = index;
        let Some(token) = stream.get(index) else {
            continue;
        };
        match token.kind {
            TokenKind::Keyword(KeywordId::Extends) => clause = Clause::Extends,
            TokenKind::Keyword(KeywordId::Implements) => clause = Clause::Implements,
            TokenKind::Punctuation(PunctuationId::LParen) => {
                if let Some(end) = find_block_end(stream, index) {
                    cursor = end;
                }
            }
            TokenKind::Name if clause == Clause::Extends && extends.is_none() => extends = Some(token.text.clone()),
            TokenKind::Name if clause == Clause::Implements => implements.push(token.text.clone()),
            _ => {}
        }
    }
    (extends, implements)
}

/// Walk the top-level statements before `position`, tracking `namespace` and class-like `use` imports.
fn scope_at(stream: &TokenStream, position: usize, classy_bodies: &[(usize, usize)]) -> Scope {
    let inside_classy = |index: usize| classy_bodies.iter().any(|&(open, close)| open < index && index < close);

    let mut scope = Scope::default();
    for (index, token) in stream.iter().take_while(|(i, _)| *i < position) {
        if token.is_keyword(KeywordId::Namespace) {
            let name = stream
                .next_meaningful(index)
                .and_then(|i| stream.get(i))
                .filter(|t| t.kind == TokenKind::Name)
                .map(|t| t.text.trim_start_matches('\\').to_string());
            scope = Scope {
                namespace: name,
                imports: ImportMap::default(),
            };
        } else if token.is_keyword(KeywordId::Use) && !inside_classy(index) {
            parse_use(stream, index, &mut scope.imports);
        }
    }
    scope
}

/// Parse a `use` statement starting at `keyword` into `imports`.
///
/// Handles aliases, comma lists and group uses (`use A\{B, C as D};`). `use function`, `use const` and closure
/// `use (...)` clauses import no classes and are ignored.
fn parse_use(stream: &TokenStream, keyword: usize, imports: &mut ImportMap) {
    let Some(first) = stream.next_meaningful(keyword) else {
        return;
    };
    let Some(first_token) = stream.get(first) else {
        return;
    };
    if first_token.is_keyword(KeywordId::Function)
        || first_token.is_keyword(KeywordId::Const)
        || first_token.is_punctuation(PunctuationId::LParen)
    {
        return;
    }

    let mut cursor = keyword;
    loop {
        let clause_start = cursor;
        let Some((prefix_index, prefix)) = next_name(stream, clause_start) else {
            return;
        };
        let Some(next) = stream.next_meaningful(prefix_index) else {
            return;
        };
        let Some(next_token) = stream.get(next) else {
            return;
        };

        if next_token.kind == TokenKind::Operator && next_token.text == "\\" {
            let Some(open) = stream
                .next_meaningful(next)
                .filter(|&i| stream.get(i).is_some_and(|t| t.is_punctuation(PunctuationId::LBrace)))
            else {
                return;
            };
            let Some(close) = find_block_end(stream, open) else {
                return;
            };
            parse_use_clauses(stream, open, close, Some(&prefix), imports);
            cursor = close;
        } else {
            cursor = parse_use_clauses(stream, clause_start, usize::MAX, None, imports);
        }

        match stream.next_meaningful(cursor).and_then(|i| stream.get(i).map(|t| (i, t))) {
            Some((i, t)) if t.is_punctuation(PunctuationId::Comma) => cursor = i,
            _ => return,
        }
    }
}

/// Parse `Name [as Alias]` clauses after `from`, stopping at `until`, a `;`, or (outside a group) a `,`.
///
/// Returns the index of the last token consumed.
fn parse_use_clauses(
    stream: &TokenStream,
    from: usize,
    until: usize,
    group_prefix: Option<&str>,
    imports: &mut ImportMap,
) -> usize {
    let mut cursor = from;
    loop {
        let Some((name_index, name)) = next_name(stream, cursor).filter(|(i, _)| *i < until) else {
            return cursor;
        };
        cursor = name_index;

        let mut alias = name.rsplit('\\').next().unwrap_or(&name).to_string();
        if let Some(as_index) = stream
            .next_meaningful(cursor)
            .filter(|&i| stream.get(i).is_some_and(|t| t.is_keyword(KeywordId::As)))
        {
            if let Some((alias_index, written_alias)) = next_name(stream, as_index) {
                alias = written_alias;
                cursor = alias_index;
            }
        }

        let fully_qualified = match group_prefix {
            Some(prefix) => format!("{}\\{}", prefix.trim_start_matches('\\'), name),
            None => name.clone(),
        };
        imports.insert(&alias, &fully_qualified);

        let separator = stream.next_meaningful(cursor).and_then(|i| stream.get(i).map(|t| (i, t)));
        match separator {
            Some((i, t)) if group_prefix.is_some() && t.is_punctuation(PunctuationId::Comma) && i < until => {
                cursor = i;
            }
            _ => return cursor,
        }
    }
}

/// The next meaningful token after `index`, if it is a name.
fn next_name(stream: &TokenStream, index: usize) -> Option<(usize, String)> {
    let next = stream.next_meaningful(index)?;
    let token = stream.get(next)?;
    (token.kind == TokenKind::Name).then(|| (next, token.text.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(source: &str) -> Vec<ClassDeclaration> {
        find_class_declarations(&TokenStream::from_code(source).unwrap())
    }

    fn derived(source: &str, names: &[&str]) -> bool {
        is_class_derived_from(&TokenStream::from_code(source).unwrap(), names)
    }

    const MIGRATION: &str = "Doctrine\\Migrations\\AbstractMigration";

    #[test]
    fn test_clauses_are_collected() {
        let found = classes("<?php class A extends B implements C, \\D\\E { }");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].extends.as_deref(), Some("B"));
        assert_eq!(found[0].implements, vec!["C".to_string(), "\\D\\E".to_string()]);
    }

    #[test]
    fn test_imported_parent_resolves() {
        let source = "<?php\nnamespace App\\Migrations;\n\nuse Doctrine\\Migrations\\AbstractMigration;\n\nfinal class V1 extends AbstractMigration {}\n";
        let class = &classes(source)[0];
        assert_eq!(class.namespace.as_deref(), Some("App\\Migrations"));
        assert_eq!(class.resolve("AbstractMigration"), MIGRATION);
        assert!(derived(source, &[MIGRATION]));
        assert!(derived(source, &["\\doctrine\\migrations\\abstractmigration"]));
    }

    #[test]
    fn test_fully_qualified_parent() {
        assert!(derived("<?php class V1 extends \\Doctrine\\Migrations\\AbstractMigration {}", &[MIGRATION]));
        assert!(!derived("<?php class V1 extends \\Other\\AbstractMigration {}", &[MIGRATION]));
    }

    #[test]
    fn test_aliased_import() {
        let source = "<?php use Doctrine\\Migrations\\AbstractMigration as Base; class V1 extends Base {}";
        assert!(derived(source, &[MIGRATION]));
    }

    #[test]
    fn test_group_use() {
        let source = "<?php use Doctrine\\Migrations\\{Version, AbstractMigration as M}; class V1 extends M {}";
        let class = &classes(source)[0];
        assert_eq!(class.imports.get("version"), Some("Doctrine\\Migrations\\Version"));
        assert!(derived(source, &[MIGRATION]));
    }

    #[test]
    fn test_comma_separated_use() {
        let source = "<?php use Foo\\Bar, Doctrine\\Migrations\\AbstractMigration; class V1 extends AbstractMigration {}";
        assert!(derived(source, &[MIGRATION]));
    }

    #[test]
    fn test_relative_name_without_import_matches_by_suffix() {
        assert!(derived("<?php class V1 extends AbstractMigration {}", &[MIGRATION]));
        assert!(derived("<?php class V1 extends Migrations\\AbstractMigration {}", &[MIGRATION]));
        assert!(!derived("<?php class V1 extends Migration {}", &[MIGRATION]));
    }

    #[test]
    fn test_import_of_a_different_class_blocks_suffix_match() {
        let source = "<?php use Other\\AbstractMigration; class V1 extends AbstractMigration {}";
        assert!(!derived(source, &[MIGRATION]));
    }

    #[test]
    fn test_function_imports_and_trait_uses_are_ignored() {
        let source = "<?php use function Foo\\AbstractMigration; class V1 extends AbstractMigration { use Other\\AbstractMigration; }";
        let class = &classes(source)[0];
        assert!(class.imports.is_empty());
        assert!(derived(source, &[MIGRATION]));
    }

    #[test]
    fn test_namespace_resets_imports() {
        let source = "<?php namespace A; use Doctrine\\Migrations\\AbstractMigration; namespace B; class V1 extends Other {}";
        let class = &classes(source)[0];
        assert_eq!(class.namespace.as_deref(), Some("B"));
        assert!(class.imports.is_empty());
    }

    #[test]
    fn test_implements_counts() {
        assert!(derived("<?php use Foo\\Marker; class V1 implements Marker {}", &["Foo\\Marker"]));
    }

    #[test]
    fn test_empty_and_unrelated() {
        assert!(!derived("<?php class V1 extends AbstractMigration {}", &["", "  "]));
        assert!(!derived("<?php class V1 {}", &[MIGRATION]));
        assert!(!derived("<?php echo 1;", &[MIGRATION]));
    }
}
