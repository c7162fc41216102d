//! ForgeBuild Core - Build Manifest Loader
//!
//! Reads a multi-step container build file and turns it into an ordered,
//! validated build plan for the step executor.
//!
//! # Load Pipeline
//! 1. Read the build file
//! 2. Substitute `_env(NAME)` tokens
//! 3. Parse YAML
//! 4. Convert steps, parse artefacts, reject duplicate names
//!
//! Nothing here executes a step or touches the paths a plan refers to.

pub mod artefact;
pub mod config;
pub mod convert;
pub mod env;
pub mod error;
pub mod hashing;
pub mod manifest;
pub mod parser;

pub use artefact::{parse_artefact, ArtefactSpec};
pub use config::{EnvVar, EnvVars, LoadConfig, Notifier, TracingNotifier};
pub use convert::StepConverter;
pub use env::{EnvSubstitutor, VarSource};
pub use error::{EnvVarError, LoadError};
pub use hashing::{plan_fingerprint, PlanHasher};
pub use manifest::{Artefact, Cleanup, Manifest, ManifestId, Step};
pub use parser::{load_build_from_file, BuildFile, CleanupFile, ManifestParser, StepFile};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
