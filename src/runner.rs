//! Run fixers over source text.

use similar::{Algorithm, ChangeTag, TextDiff};
use thiserror::Error;
use tidyphp_syntax::TokenStream;
use tidyphp_syntax::diagnostics::LexError;

use crate::fixer::Fixer;

#[derive(Debug, Error)]
pub enum FixError {
    #[error("failed to tokenize source ({} error(s))", .0.len())]
    Lex(Vec<LexError>),
}

/// Outcome of fixing one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixReport {
    pub code: String,
    /// Names of the fixers that changed something, in run order.
    pub applied: Vec<&'static str>,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Lex `source`, run `fixers` in the given order on one shared stream and serialize the result.
///
/// Fixers are expected to be sorted already (see [`crate::fixer::build_fixers`]).
#[tracing::instrument(skip_all, fields(source_len = source.len(), fixers = fixers.len()))]
pub fn fix_source(source: &str, fixers: &[Box<dyn Fixer>]) -> Result<FixReport, FixError> {
    let mut stream = TokenStream::from_code(source).map_err(FixError::Lex)?;

    let mut applied = Vec::new();
    for fixer in fixers {
        if fixer.fix(&mut stream) {
            tracing::debug!(fixer = fixer.name(), "applied");
            applied.push(fixer.name());
        }
    }

    let code = if applied.is_empty() {
        source.to_string()
    } else {
        stream.generate_code()
    };
    Ok(FixReport { code, applied })
}

/// Line diff between `original` and `fixed`, or `None` when they are equal.
///
/// Lines are aligned with Myers' algorithm; removed lines are prefixed `-`, added ones `+`, each with its 1-based
/// line number in the file it comes from.
pub fn line_diff(original: &str, fixed: &str) -> Option<String> {
    if original == fixed {
        return None;
    }

    let diff = TextDiff::configure().algorithm(Algorithm::Myers).diff_lines(original, fixed);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        let (sign, index) = match change.tag() {
            ChangeTag::Equal => continue,
            ChangeTag::Delete => ('-', change.old_index()),
            ChangeTag::Insert => ('+', change.new_index()),
        };
        let line = change.value().trim_end_matches(['\n', '\r']);
        output.push_str(&format!("{sign}{:4} | {line}\n", index.map_or(0, |i| i + 1)));
    }
    Some(output)
}
