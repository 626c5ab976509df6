//! Static fixer registry.
//!
//! Every fixer tidyphp ships has one entry here. The CLI, the `describe` output and the runner all go through this
//! table; there is no runtime discovery.

use super::doctrine_migrations::{self, DoctrineMigrationsFixer};
use super::Fixer;
use crate::config::{ConfigError, RulesConfig};

/// How to build one fixer from the rules configuration.
pub struct FixerFactory {
    pub name: &'static str,
    /// Whether the configuration turns the fixer on.
    pub enabled: fn(&RulesConfig) -> bool,
    /// Build the fixer with its configured (or default) options.
    pub build: fn(&RulesConfig) -> Result<Box<dyn Fixer>, ConfigError>,
}

pub const FIXERS: &[FixerFactory] = &[FixerFactory {
    name: doctrine_migrations::NAME,
    enabled: doctrine_migrations_enabled,
    build: build_doctrine_migrations,
}];

fn doctrine_migrations_enabled(rules: &RulesConfig) -> bool {
    rules.doctrine_migrations.is_enabled()
}

fn build_doctrine_migrations(rules: &RulesConfig) -> Result<Box<dyn Fixer>, ConfigError> {
    let fixer = DoctrineMigrationsFixer::new(rules.doctrine_migrations.options())?;
    Ok(Box::new(fixer))
}

/// Names of all registered fixers, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FIXERS.iter().map(|f| f.name)
}

/// Build the fixer called `name`, whether or not the configuration enables it.
///
/// Returns `Ok(None)` for unknown names.
pub fn build_fixer(name: &str, rules: &RulesConfig) -> Result<Option<Box<dyn Fixer>>, ConfigError> {
    FIXERS
        .iter()
        .find(|f| f.name == name)
        .map(|f| (f.build)(rules))
        .transpose()
}

/// Build every enabled fixer, highest priority first.
pub fn build_fixers(rules: &RulesConfig) -> Result<Vec<Box<dyn Fixer>>, ConfigError> {
    let mut fixers = FIXERS
        .iter()
        .filter(|f| (f.enabled)(rules))
        .map(|f| (f.build)(rules))
        .collect::<Result<Vec<_>, _>>()?;
    fixers.sort_by_key(|f| std::cmp::Reverse(f.priority()));
    tracing::debug!(count = fixers.len(), "built fixers");
    Ok(fixers)
}
