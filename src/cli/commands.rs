//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use miette::{NamedSource, Report};

use crate::config::{Config, ConfigError, RulesConfig};
use crate::describe::describe;
use crate::fixer::{self, Fixer, registry};
use crate::runner::{FixError, fix_source, line_diff};

use super::{CliError, CliResult, ExitCode};

/// Render a diagnostic the way miette prints it, for `CliError` messages.
fn render_config_error(error: ConfigError) -> CliError {
    CliError::failure(format!("{:?}", Report::new(error)))
}

fn load_rules(config: Option<&Path>) -> CliResult<RulesConfig> {
    Config::resolve(config, Path::new("."))
        .map(|config| config.rules)
        .map_err(render_config_error)
}

// ============================================================================
// fix
// ============================================================================

/// Fix every `.php` file under `path`.
///
/// - default: rewrite changed files in place
/// - `check_mode`: list files that would change, fail if any
/// - `diff_mode`: print a diff for each file that would change, fail if any
pub fn fix_files(path: &Path, check_mode: bool, diff_mode: bool, config: Option<&Path>) -> CliResult<ExitCode> {
    let rules = load_rules(config)?;
    let fixers = fixer::build_fixers(&rules).map_err(render_config_error)?;

    let files = collect_php_files(path);
    if files.is_empty() {
        return Err(CliError::failure(format!("No .php files found in {}", path.display())));
    }

    let mut needs_fixing = 0;
    let mut fixed_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match fs::read_to_string(file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", file_path.display(), e);
                error_count += 1;
                continue;
            }
        };

        let report = match fix_source(&source, &fixers) {
            Ok(report) => report,
            Err(FixError::Lex(errors)) => {
                report_lex_errors(file_path, &source, errors);
                error_count += 1;
                continue;
            }
        };
        if !report.changed() {
            continue;
        }
        tracing::debug!(file = %file_path.display(), rules = ?report.applied, "fixed");

        if diff_mode {
            println!("--- {}", file_path.display());
            if let Some(diff) = line_diff(&source, &report.code) {
                print!("{}", diff);
            }
            println!();
        }

        if check_mode || diff_mode {
            if check_mode {
                println!("Would fix: {} ({})", file_path.display(), report.applied.join(", "));
            }
            needs_fixing += 1;
        } else if let Err(e) = fs::write(file_path, &report.code) {
            eprintln!("Error writing {}: {}", file_path.display(), e);
            error_count += 1;
        } else {
            println!("Fixed: {} ({})", file_path.display(), report.applied.join(", "));
            fixed_count += 1;
        }
    }

    if check_mode || diff_mode {
        if needs_fixing > 0 {
            return Err(CliError::failure(format!(
                "\n{} of {} file(s) need fixing",
                needs_fixing,
                files.len()
            )));
        }
        println!("✓ {} file(s) already clean", files.len());
    } else {
        println!("\n✓ {} file(s) fixed, {} error(s)", fixed_count, error_count);
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

fn report_lex_errors(file_path: &Path, source: &str, errors: Vec<tidyphp_syntax::diagnostics::LexError>) {
    let name = file_path.display().to_string();
    for error in errors {
        let report = Report::new(error).with_source_code(NamedSource::new(&name, source.to_string()));
        eprintln!("{:?}", report);
    }
}

/// `.php` files at `path`: the file itself, or every one below a directory (hidden directories and `vendor/` are
/// skipped). Sorted for stable output.
fn collect_php_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_php(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "vendor" && name != "node_modules" {
                        files.extend(collect_php_files(&entry_path));
                    }
                } else if is_php(&entry_path) {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}

fn is_php(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "php")
}

// ============================================================================
// describe / list
// ============================================================================

/// Print the documentation of `rule`, or of every rule.
pub fn describe_rules(rule: Option<&str>) -> CliResult<ExitCode> {
    let rules = RulesConfig::default();
    let names: Vec<&str> = match rule {
        Some(name) => vec![name],
        None => registry::names().collect(),
    };

    for (index, name) in names.iter().enumerate() {
        let fixer = registry::build_fixer(name, &rules)
            .map_err(render_config_error)?
            .ok_or_else(|| unknown_rule(name))?;
        if index > 0 {
            println!();
        }
        print!("{}", describe(fixer.as_ref()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print every rule with its priority, in execution order.
pub fn list_rules() -> CliResult<ExitCode> {
    let mut fixers = registry::FIXERS
        .iter()
        .map(|factory| (factory.build)(&RulesConfig::default()))
        .collect::<Result<Vec<Box<dyn Fixer>>, _>>()
        .map_err(render_config_error)?;
    fixers.sort_by_key(|f| std::cmp::Reverse(f.priority()));
    for fixer in &fixers {
        println!("{:<24} {:>5}  {}", fixer.name(), fixer.priority(), fixer.definition().summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn unknown_rule(name: &str) -> CliError {
    let known: Vec<&str> = registry::names().collect();
    CliError::failure(format!("Unknown rule `{}`. Available rules: {}", name, known.join(", ")))
}
