//! Fixers: rules that rewrite a token stream in place.
//!
//! ## Modules
//!
//! - `priority` - Ordering between fixers, including external peers
//! - `registry` - Static table of the fixers tidyphp ships
//! - `doctrine_migrations` - Strips Doctrine migration scaffolding

pub mod doctrine_migrations;
pub mod priority;
pub mod registry;

pub use doctrine_migrations::DoctrineMigrationsFixer;
pub use priority::{PeerFixer, Priority};
pub use registry::{FIXERS, FixerFactory, build_fixer, build_fixers};

use tidyphp_syntax::TokenStream;

/// User-facing documentation of a fixer.
#[derive(Debug, Clone, PartialEq)]
pub struct FixerDefinition {
    /// One-sentence description of what the fixer does.
    pub summary: &'static str,
    /// Source code the fixer changes.
    pub sample_code: &'static str,
    /// Configurations worth showing next to the sample; `null` stands for the defaults.
    pub sample_configurations: Vec<serde_json::Value>,
}

/// A token stream rule.
///
/// Implementations must be idempotent: fixing an already fixed stream changes nothing.
pub trait Fixer {
    /// Stable snake_case name, used in configuration and on the command line.
    fn name(&self) -> &'static str;

    fn definition(&self) -> FixerDefinition;

    fn priority(&self) -> Priority;

    /// External fixers this one must run before. Informational; ordering comes from [`Fixer::priority`].
    fn runs_before(&self) -> &'static [PeerFixer] {
        &[]
    }

    /// Whether the stream is worth fixing at all. Must not mutate anything.
    fn is_candidate(&self, stream: &TokenStream) -> bool;

    /// Rewrite the stream. Only called on candidates.
    fn apply_fix(&self, stream: &mut TokenStream);

    /// Fix the stream if it is a candidate. Returns whether anything changed.
    fn fix(&self, stream: &mut TokenStream) -> bool {
        if !self.is_candidate(stream) {
            tracing::trace!(fixer = self.name(), "not a candidate");
            return false;
        }
        let revision = stream.revision();
        self.apply_fix(stream);
        stream.revision() != revision
    }
}
