//! `doctrine_migrations`: strip the scaffolding Doctrine's migration generator leaves behind.
//!
//! On files declaring a class derived from one of the configured parents:
//! 1. `getDescription()` methods whose whole body is `return '';` (or `""`) are removed, along with their
//!    attributes and doc comment.
//! 2. The generator's comment lines are dropped from every comment; comments left empty are removed.

use tidyphp_core::lang::keywords::KeywordId;
use tidyphp_core::lang::punctuation::PunctuationId;
use tidyphp_syntax::analyzer::{PatternSequence, TokenPredicate};
use tidyphp_syntax::rewrite;
use tidyphp_syntax::{TokenKind, TokenStream, TokensAnalyzer};

use super::{Fixer, FixerDefinition, PeerFixer, Priority};
use crate::config::{ConfigError, DEFAULT_MIGRATION_PARENT, DoctrineMigrationsConfig};

pub const NAME: &str = "doctrine_migrations";

/// Comment lines written by the migration generator.
pub const GENERATED_COMMENTS: [&str; 3] = [
    "Auto-generated Migration: Please modify to your needs!",
    "this up() migration is auto-generated, please modify it to your needs",
    "this down() migration is auto-generated, please modify it to your needs",
];

/// Accessor removed when it only returns an empty string. Matched case-sensitively.
const DESCRIPTION_ACCESSOR: &str = "getDescription";

const RUNS_BEFORE: &[PeerFixer] = &[
    PeerFixer::ClassAttributesSeparation,
    PeerFixer::NoEmptyPhpdoc,
    PeerFixer::NoExtraBlankLines,
];

const SAMPLE_CODE: &str = r#"<?php

declare(strict_types=1);

namespace Infrastructure\Doctrine\Migrations;

use Doctrine\DBAL\Schema\Schema;
use Doctrine\Migrations\AbstractMigration;

/**
 * Auto-generated Migration: Please modify to your needs!
 */
final class Version20190323095102 extends AbstractMigration
{
    public function getDescription()
    {
        return '';
    }

    public function up(Schema $schema)
    {
        // this up() migration is auto-generated, please modify it to your needs
        $this->abortIf('mysql' !== $this->connection->getDatabasePlatform()->getName(), 'Migration can only be executed safely on \'mysql\'.');

        $this->addSql('CREATE TABLE admin (identifier CHAR(36) NOT NULL COMMENT \'(DC2Type:guid)\', PRIMARY KEY(identifier)) DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci ENGINE = InnoDB');
    }

    public function down(Schema $schema)
    {
        // this down() migration is auto-generated, please modify it to your needs
        $this->abortIf('mysql' !== $this->connection->getDatabasePlatform()->getName(), 'Migration can only be executed safely on \'mysql\'.');

        $this->addSql('DROP TABLE admin');
    }
}
"#;

/// Removes useless `getDescription()` methods and generated comments from Doctrine migrations.
#[derive(Debug, Clone, Default)]
pub struct DoctrineMigrationsFixer {
    config: DoctrineMigrationsConfig,
}

impl DoctrineMigrationsFixer {
    /// Build the fixer, validating `config` once.
    pub fn new(config: DoctrineMigrationsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DoctrineMigrationsConfig {
        &self.config
    }

    /// `{ return ''; }` and `{ return ""; }`.
    fn empty_description_bodies() -> [PatternSequence; 2] {
        ["''", "\"\""].map(|literal| {
            PatternSequence::new(vec![
                TokenPredicate::punctuation(PunctuationId::LBrace),
                TokenPredicate::keyword(KeywordId::Return),
                TokenPredicate::exact(TokenKind::StringLiteral, literal),
                TokenPredicate::punctuation(PunctuationId::Semicolon),
                TokenPredicate::punctuation(PunctuationId::RBrace),
            ])
        })
    }

    /// Remove every `getDescription()` whose body is exactly an empty-string return, together with its attributes
    /// and doc comment.
    ///
    /// Returns the number of methods removed.
    fn remove_empty_descriptions(&self, stream: &mut TokenStream) -> usize {
        let patterns = Self::empty_description_bodies();
        let analyzer = TokensAnalyzer::new(stream);
        let targets: Vec<(usize, usize)> = analyzer
            .methods()
            .into_iter()
            .filter(|method| method.name == DESCRIPTION_ACCESSOR)
            .filter_map(|method| {
                let (open, close) = method.body?;
                let starts = analyzer.find_all_sequences(&patterns, open, close);
                starts
                    .contains(&open)
                    .then(|| (analyzer.find_decorated_start(method.start), method.end))
            })
            .collect();

        for &(start, end) in &targets {
            tracing::debug!(start, end, "removing empty getDescription()");
            rewrite::clear_range(stream, start, end);
        }
        targets.len()
    }
}

impl Fixer for DoctrineMigrationsFixer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> FixerDefinition {
        FixerDefinition {
            summary: "Remove useless getDescription(), up(), down() and comments from \
                      Doctrine\\Migrations\\AbstractMigration if needed.",
            sample_code: SAMPLE_CODE,
            sample_configurations: vec![
                serde_json::Value::Null,
                serde_json::json!({ "instanceof": [DEFAULT_MIGRATION_PARENT] }),
            ],
        }
    }

    fn priority(&self) -> Priority {
        Priority::before(RUNS_BEFORE)
    }

    fn runs_before(&self) -> &'static [PeerFixer] {
        RUNS_BEFORE
    }

    fn is_candidate(&self, stream: &TokenStream) -> bool {
        TokensAnalyzer::new(stream).is_class_derived_from(self.config.instanceof.as_slice())
    }

    #[tracing::instrument(skip_all, fields(fixer = NAME))]
    fn apply_fix(&self, stream: &mut TokenStream) {
        let mut methods = self.remove_empty_descriptions(stream);
        let comments = rewrite::filter_comments(stream, &GENERATED_COMMENTS);
        // A generated comment inside `getDescription()` hides the empty body until it is gone.
        if comments > 0 {
            methods += self.remove_empty_descriptions(stream);
        }
        tracing::debug!(methods, comments, "doctrine migration cleaned");
    }
}
