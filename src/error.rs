//! Load Errors
//!
//! Every failure is a function of the input. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read build file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse build file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Step name '{0}' is not unique")]
    DuplicateStep(String),

    #[error("Invalid environment token pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl LoadError {
    /// True for errors raised while validating the converted plan.
    pub fn is_validation(&self) -> bool {
        matches!(self, LoadError::DuplicateStep(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvVarError {
    #[error("Invalid environment variable '{0}', expected KEY=VALUE")]
    MissingSeparator(String),

    #[error("Environment variable '{0}' has an empty name")]
    EmptyName(String),
}
