use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Failure while expanding `{{ env.VAR }}` placeholders
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder references an unset variable and has no default
    #[error("environment variable not found: `{0}`")]
    MissingVar(String),

    /// Placeholder is not scoped with `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: the key (e.g. `env.ANTHROPIC_API_KEY`)
    // Group 2: optional value inside default("...")
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are left untouched so that disabled
/// settings never require their variables to exist.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let lines = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_owned())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut first_error = None;

    let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
        match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                first_error.get_or_insert(e);
                String::new()
            }
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let var_name = match key.split_once('.') {
        Some(("env", name)) if !name.contains('.') => name,
        _ => return Err(ExpandError::UnsupportedScope(key.to_owned())),
    };

    std::env::var(var_name).or_else(|_| {
        default
            .map(str::to_owned)
            .ok_or_else(|| ExpandError::MissingVar(var_name.to_owned()))
    })
}
