//! Load Configuration
//!
//! Inputs consumed by a single manifest load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EnvVarError;

pub const DEFAULT_BUILDFILE: &str = "build.yml";

/// Sink for informational messages emitted while loading.
///
/// Notices never carry errors; failures travel through `LoadError`.
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// Forwards notices to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notice(&self, message: &str) {
        tracing::info!(target: "forgebuild::notice", "{}", message);
    }
}

/// A single `KEY=VALUE` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl FromStr for EnvVar {
    type Err = EnvVarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| EnvVarError::MissingSeparator(s.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(EnvVarError::EmptyName(s.to_string()));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Caller-supplied variable table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVars(Vec<EnvVar>);

impl EnvVars {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(EnvVar {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Value of the first entry named `key`, or an empty string.
    pub fn find(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
            .unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.0.iter()
    }
}

impl FromIterator<EnvVar> for EnvVars {
    fn from_iter<I: IntoIterator<Item = EnvVar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| EnvVar {
                    key: k.into(),
                    value: v.into(),
                })
                .collect(),
        )
    }
}

/// Everything a load needs besides the file contents.
#[derive(Clone)]
pub struct LoadConfig {
    pub buildfile: PathBuf,
    /// Drops cleanup blocks, so they never trigger privileged mode.
    pub no_squash: bool,
    /// Used instead of the process environment when non-empty.
    pub env_vars: EnvVars,
    pub notifier: Arc<dyn Notifier>,
}

impl LoadConfig {
    pub fn new(buildfile: impl AsRef<Path>) -> Self {
        Self {
            buildfile: buildfile.as_ref().to_path_buf(),
            no_squash: false,
            env_vars: EnvVars::default(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_no_squash(mut self, no_squash: bool) -> Self {
        self.no_squash = no_squash;
        self
    }

    pub fn with_env_vars(mut self, env_vars: EnvVars) -> Self {
        self.env_vars = env_vars;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUILDFILE)
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("buildfile", &self.buildfile)
            .field("no_squash", &self.no_squash)
            .field("env_vars", &self.env_vars)
            .finish_non_exhaustive()
    }
}
