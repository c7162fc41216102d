//! Manifest Loading - Single Entry Point
//!
//! read -> substitute `_env(..)` tokens -> parse YAML -> convert.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::config::LoadConfig;
use crate::convert::StepConverter;
use crate::env::{EnvSubstitutor, VarSource};
use crate::error::LoadError;
use crate::manifest::Manifest;

// Raw shapes as written in the build file. Nothing is validated yet.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildFile {
    #[serde(default)]
    pub workdir: String,
    #[serde(default)]
    pub steps: Vec<StepFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFile {
    pub name: String,
    #[serde(default)]
    pub dockerfile: String,
    #[serde(default)]
    pub artefacts: Vec<String>,
    #[serde(default)]
    pub cleanup: Option<CleanupFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupFile {
    #[serde(default)]
    pub commands: Vec<String>,
}

pub struct ManifestParser<'a> {
    config: &'a LoadConfig,
    substitutor: EnvSubstitutor,
}

impl<'a> ManifestParser<'a> {
    pub fn new(config: &'a LoadConfig) -> Result<Self, LoadError> {
        Ok(Self {
            config,
            substitutor: EnvSubstitutor::new()?,
        })
    }

    /// Load the build file named in the configuration.
    pub fn load(&self) -> Result<Manifest, LoadError> {
        let path = &self.config.buildfile;
        self.config
            .notifier
            .notice(&format!("Using '{}' as build file", path.display()));

        let data = fs::read(path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;

        self.parse_slice(&data)
    }

    /// Same pipeline as `load`, minus the file read. Encoding problems are
    /// parse errors.
    pub fn parse_slice(&self, raw: &[u8]) -> Result<Manifest, LoadError> {
        let source = VarSource::for_table(&self.config.env_vars);
        let data = self.substitutor.substitute(raw, source);

        let build: BuildFile = serde_yaml::from_slice(&data)?;

        let manifest = StepConverter::new(self.config.no_squash).convert(build)?;
        tracing::info!(
            id = %manifest.id(),
            steps = manifest.len(),
            privileged = manifest.is_privileged(),
            "Loaded build manifest"
        );
        Ok(manifest)
    }

    pub fn parse_str(&self, data: &str) -> Result<Manifest, LoadError> {
        self.parse_slice(data.as_bytes())
    }
}

/// Convenience wrapper over `ManifestParser::load`.
pub fn load_build_from_file(config: &LoadConfig) -> Result<Manifest, LoadError> {
    ManifestParser::new(config)?.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvVars;

    #[test]
    fn test_parse_minimal_build() {
        let config = LoadConfig::default();
        let m = ManifestParser::new(&config)
            .unwrap()
            .parse_str("workdir: /src\nsteps:\n  - name: only\n")
            .unwrap();
        assert_eq!(m.workdir(), "/src");
        assert_eq!(m.len(), 1);
        assert_eq!(m.steps()[0].dockerfile, "");
        assert!(m.steps()[0].artefacts.is_empty());
    }

    #[test]
    fn test_steps_must_be_a_list() {
        let config = LoadConfig::default();
        let err = ManifestParser::new(&config)
            .unwrap()
            .parse_str("steps: not-a-list\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_step_without_name_is_a_parse_error() {
        let config = LoadConfig::default();
        let err = ManifestParser::new(&config)
            .unwrap()
            .parse_str("steps:\n  - dockerfile: Dockerfile\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_tokens_are_substituted_before_parsing() {
        let vars: EnvVars = [("STEP", "compile"), ("DF", "Dockerfile.build")]
            .into_iter()
            .collect();
        let config = LoadConfig::default().with_env_vars(vars);
        let m = ManifestParser::new(&config)
            .unwrap()
            .parse_str("steps:\n  - name: _env(STEP)\n    dockerfile: _env(DF)\n")
            .unwrap();
        assert_eq!(m.steps()[0].name, "compile");
        assert_eq!(m.steps()[0].dockerfile, "Dockerfile.build");
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let config = LoadConfig::default();
        let err = ManifestParser::new(&config)
            .unwrap()
            .parse_slice(b"steps:\n  - name: caf\xe9\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
