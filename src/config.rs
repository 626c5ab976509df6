//! Configuration for tidyphp
//!
//! Read from a JSON file (`tidyphp.json` by default):
//!
//! ```json
//! { "rules": { "doctrine_migrations": { "instanceof": ["Doctrine\\Migrations\\AbstractMigration"] } } }
//! ```
//!
//! Every section is optional. A rule section may also be `true` (enabled with defaults) or `false` (disabled).

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tidyphp.json";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(tidyphp::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    #[diagnostic(
        code(tidyphp::config::parse),
        help("rule sections live under \"rules\", keyed by rule name; each is an options object, true or false")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid option `{option}` for rule `{rule}`: {reason}")]
    #[diagnostic(code(tidyphp::config::option))]
    InvalidOption {
        rule: &'static str,
        option: &'static str,
        reason: String,
        #[help]
        help: &'static str,
    },
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Parse config text. `origin` is only used in error messages.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %origin.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `explicit` if given, otherwise [`CONFIG_FILE_NAME`] from `dir` if it exists, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = dir.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            return Self::load(&implicit);
        }
        Ok(Self::default())
    }
}

/// Per-rule settings, one field per rule in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub doctrine_migrations: RuleSetting<DoctrineMigrationsConfig>,
}

impl RulesConfig {
    pub fn with_doctrine_migrations(mut self, config: DoctrineMigrationsConfig) -> Self {
        self.doctrine_migrations = RuleSetting::Configured(config);
        self
    }

    pub fn without_doctrine_migrations(mut self) -> Self {
        self.doctrine_migrations = RuleSetting::Toggle(false);
        self
    }
}

/// A rule section: a plain on/off switch or the rule's options (which imply "on").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting<T> {
    Toggle(bool),
    Configured(T),
}

impl<T> Default for RuleSetting<T> {
    fn default() -> Self {
        RuleSetting::Toggle(true)
    }
}

impl<T: Clone + Default> RuleSetting<T> {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RuleSetting::Toggle(false))
    }

    /// The rule's options, defaults when only toggled.
    pub fn options(&self) -> T {
        match self {
            RuleSetting::Configured(options) => options.clone(),
            RuleSetting::Toggle(_) => T::default(),
        }
    }
}

/// Default parent type of Doctrine migrations.
pub const DEFAULT_MIGRATION_PARENT: &str = "Doctrine\\Migrations\\AbstractMigration";

/// Options of the `doctrine_migrations` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoctrineMigrationsConfig {
    /// Parent classes (or interfaces) of your migration classes.
    #[serde(default = "default_instanceof")]
    pub instanceof: Vec<String>,
}

fn default_instanceof() -> Vec<String> {
    vec![DEFAULT_MIGRATION_PARENT.to_string()]
}

impl Default for DoctrineMigrationsConfig {
    fn default() -> Self {
        Self {
            instanceof: default_instanceof(),
        }
    }
}

impl DoctrineMigrationsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parent names.
    pub fn with_instanceof<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instanceof = names.into_iter().map(Into::into).collect();
        self
    }

    /// Every entry must name something once surrounding whitespace and a leading `\` are dropped. An empty list is
    /// valid and matches no file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(position) = self
            .instanceof
            .iter()
            .position(|name| name.trim().trim_start_matches('\\').is_empty())
        {
            return Err(ConfigError::InvalidOption {
                rule: "doctrine_migrations",
                option: "instanceof",
                reason: format!("entry {position} is empty"),
                help: "list fully-qualified class names, e.g. \"Doctrine\\\\Migrations\\\\AbstractMigration\"",
            });
        }
        Ok(())
    }
}
