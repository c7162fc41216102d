//! Environment Token Substitution
//!
//! Rewrites `_env(NAME)` tokens in the raw manifest bytes before they are
//! parsed. Bytes that are not UTF-8 pass through untouched; the YAML parser
//! rejects them later.

use regex::bytes::{Captures, Regex};

use crate::config::EnvVars;
use crate::error::LoadError;

/// Matches `_env(NAME)`. Stops at the first `)` and never crosses a line.
pub const ENV_TOKEN_PATTERN: &str = r"_env\((.*?)\)";

/// Where token values come from.
///
/// The choice is made once per pass, never per token.
#[derive(Debug, Clone, Copy)]
pub enum VarSource<'a> {
    Process,
    Table(&'a EnvVars),
}

impl<'a> VarSource<'a> {
    /// An empty table means the process environment.
    pub fn for_table(vars: &'a EnvVars) -> Self {
        if vars.is_empty() {
            VarSource::Process
        } else {
            VarSource::Table(vars)
        }
    }

    /// Absent names resolve to an empty string. A table never falls back
    /// to the process environment.
    pub fn resolve(&self, name: &str) -> String {
        match self {
            VarSource::Process => std::env::var(name).unwrap_or_default(),
            VarSource::Table(vars) => vars.find(name).to_string(),
        }
    }
}

pub struct EnvSubstitutor {
    pattern: Regex,
}

impl EnvSubstitutor {
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self {
            pattern: Regex::new(ENV_TOKEN_PATTERN)?,
        })
    }

    pub fn substitute(&self, raw: &[u8], source: VarSource<'_>) -> Vec<u8> {
        self.pattern
            .replace_all(raw, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .map(|m| String::from_utf8_lossy(m.as_bytes()))
                    .unwrap_or_default();
                source.resolve(&name).into_bytes()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> EnvVars {
        pairs.iter().copied().collect()
    }

    fn substitute(text: &str, vars: &EnvVars) -> String {
        let sub = EnvSubstitutor::new().unwrap();
        String::from_utf8(sub.substitute(text.as_bytes(), VarSource::for_table(vars))).unwrap()
    }

    #[test]
    fn test_table_replaces_every_token() {
        let vars = table(&[("A", "one"), ("B", "two")]);
        let out = substitute("x: _env(A)-_env(B)\ny: _env(A)", &vars);
        assert_eq!(out, "x: one-two\ny: one");
    }

    #[test]
    fn test_table_miss_yields_empty_without_process_fallback() {
        std::env::set_var("FORGEBUILD_ENV_UNIT_PATH_MISS", "from-process");
        let vars = table(&[("OTHER", "x")]);
        let out = substitute("v: '_env(FORGEBUILD_ENV_UNIT_PATH_MISS)'", &vars);
        assert_eq!(out, "v: ''");
    }

    #[test]
    fn test_empty_table_reads_process_environment() {
        std::env::set_var("FORGEBUILD_ENV_UNIT_PROCESS", "bar");
        let out = substitute("_env(FORGEBUILD_ENV_UNIT_PROCESS)", &EnvVars::new());
        assert_eq!(out, "bar");
    }

    #[test]
    fn test_unterminated_token_is_left_alone() {
        let vars = table(&[("A", "one")]);
        let text = "a: _env(A\nb: _env";
        assert_eq!(substitute(text, &vars), text);
    }

    #[test]
    fn test_text_without_tokens_is_unchanged() {
        let text = "steps:\n  - name: env(A)\n";
        assert_eq!(substitute(text, &EnvVars::new()), text);
    }

    #[test]
    fn test_nested_parens_end_at_first_close() {
        // Name is "A(B"; the outer ")" stays in the text.
        let vars = table(&[("A(B", "x"), ("A", "one")]);
        assert_eq!(substitute("v: _env(A(B))", &vars), "v: x)");
    }

    #[test]
    fn test_invalid_utf8_passes_through() {
        let sub = EnvSubstitutor::new().unwrap();
        let vars = table(&[("A", "one")]);
        let raw = b"name: caf\xe9 _env(A)\n";
        let out = sub.substitute(raw, VarSource::for_table(&vars));
        assert_eq!(out, b"name: caf\xe9 one\n".to_vec());
    }
}
