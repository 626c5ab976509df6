//! Integration tests for the token analysis layer
//!
//! Candidacy and method discovery are checked against a table of small PHP sources.

use tidyphp_syntax::analyzer::{ElementKind, find_block_end};
use tidyphp_syntax::{TokenStream, TokensAnalyzer};

const MIGRATION: &str = "Doctrine\\Migrations\\AbstractMigration";

struct CandidacyCase {
    name: &'static str,
    source: &'static str,
    parents: &'static [&'static str],
    expected: bool,
}

const CANDIDACY_CASES: &[CandidacyCase] = &[
    CandidacyCase {
        name: "imported parent",
        source: "<?php use Doctrine\\Migrations\\AbstractMigration; final class V extends AbstractMigration {}",
        parents: &[MIGRATION],
        expected: true,
    },
    CandidacyCase {
        name: "fully qualified parent",
        source: "<?php class V extends \\Doctrine\\Migrations\\AbstractMigration {}",
        parents: &[MIGRATION],
        expected: true,
    },
    CandidacyCase {
        name: "configured with leading backslash",
        source: "<?php use Doctrine\\Migrations\\AbstractMigration; class V extends AbstractMigration {}",
        parents: &["\\Doctrine\\Migrations\\AbstractMigration"],
        expected: true,
    },
    CandidacyCase {
        name: "interface",
        source: "<?php namespace App; class V implements Contracts\\Migration {}",
        parents: &["App\\Contracts\\Migration"],
        expected: true,
    },
    CandidacyCase {
        name: "second of several parents",
        source: "<?php class V extends Legacy\\Migration {}",
        parents: &[MIGRATION, "Legacy\\Migration"],
        expected: true,
    },
    CandidacyCase {
        name: "anonymous class",
        source: "<?php use Doctrine\\Migrations\\AbstractMigration; return new class($c) extends AbstractMigration {};",
        parents: &[MIGRATION],
        expected: true,
    },
    CandidacyCase {
        name: "different class with the same short name",
        source: "<?php use Acme\\AbstractMigration; class V extends AbstractMigration {}",
        parents: &[MIGRATION],
        expected: false,
    },
    CandidacyCase {
        name: "interface declaration is not a class",
        source: "<?php interface V extends AbstractMigration {}",
        parents: &[MIGRATION],
        expected: false,
    },
    CandidacyCase {
        name: "name only mentioned in a string",
        source: "<?php $parent = 'Doctrine\\Migrations\\AbstractMigration'; class V {}",
        parents: &[MIGRATION],
        expected: false,
    },
    CandidacyCase {
        name: "no class at all",
        source: "<?php echo AbstractMigration::class;",
        parents: &[MIGRATION],
        expected: false,
    },
    CandidacyCase {
        name: "empty configuration",
        source: "<?php class V extends \\Doctrine\\Migrations\\AbstractMigration {}",
        parents: &[],
        expected: false,
    },
];

#[test]
fn test_candidacy_table() {
    for case in CANDIDACY_CASES {
        let stream = TokenStream::from_code(case.source).expect("source must tokenize");
        let actual = TokensAnalyzer::new(&stream).is_class_derived_from(case.parents);
        assert_eq!(actual, case.expected, "[{}]", case.name);
    }
}

#[test]
fn test_method_ranges_cover_declarations() {
    let source = "<?php\nfinal class V\n{\n    #[Pure]\n    final public static function a(): string\n    {\n        return \"}\";\n    }\n\n    abstract protected function b(array $x = [1, 2]);\n}\n";
    let stream = TokenStream::from_code(source).unwrap();
    let methods = TokensAnalyzer::new(&stream).methods();
    assert_eq!(methods.len(), 2);

    let text = |i: usize| stream.get(i).unwrap().text.as_str();

    let a = &methods[0];
    assert_eq!(a.name, "a");
    assert_eq!(text(a.start), "final");
    let (open, close) = a.body.unwrap();
    assert_eq!((text(open), text(close)), ("{", "}"));
    assert_eq!(close, a.end);

    let b = &methods[1];
    assert_eq!(b.name, "b");
    assert_eq!(text(b.start), "abstract");
    assert_eq!(text(b.end), ";");
    assert!(b.body.is_none());
}

#[test]
fn test_elements_in_source_order() {
    let source = "<?php\ntrait T { function t() {} }\nenum E { case A; }\nclass C { use T; function c() { return new class { function inner() {} }; } }\n";
    let stream = TokenStream::from_code(source).unwrap();
    let kinds: Vec<(ElementKind, String)> = TokensAnalyzer::new(&stream)
        .elements()
        .into_iter()
        .map(|e| (e.kind, e.name))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ElementKind::Trait, "T".to_string()),
            (ElementKind::Method, "t".to_string()),
            (ElementKind::Enum, "E".to_string()),
            (ElementKind::Class, "C".to_string()),
            (ElementKind::Method, "c".to_string()),
            (ElementKind::Class, "class@anonymous".to_string()),
            (ElementKind::Method, "inner".to_string()),
        ]
    );
}

#[test]
fn test_malformed_sources_never_panic() {
    let sources = [
        "<?php class",
        "<?php class A {",
        "<?php class A { function",
        "<?php class A { function b(",
        "<?php class A { function b() {",
        "<?php }}} class A extends { function () {} }",
        "<?php use ; use Foo\\{; namespace;",
        "<?php new class",
    ];
    for source in sources {
        let stream = TokenStream::from_code(source).unwrap();
        let analyzer = TokensAnalyzer::new(&stream);
        let _ = analyzer.elements();
        let _ = analyzer.is_class_derived_from(&[MIGRATION]);
        for index in 0..stream.len() {
            let _ = find_block_end(&stream, index);
        }
    }
}
