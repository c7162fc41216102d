//! Artefact Specifications
//!
//! `<source>[:<dest>]`, split on the first colon only.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEST: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtefactSpec {
    pub source: String,
    /// Destination folder. The file name comes from the source.
    pub dest: String,
}

pub fn parse_artefact(spec: &str) -> ArtefactSpec {
    match spec.split_once(':') {
        Some((source, dest)) => ArtefactSpec {
            source: source.to_string(),
            dest: dest.to_string(),
        },
        None => ArtefactSpec {
            source: spec.to_string(),
            dest: DEFAULT_DEST.to_string(),
        },
    }
}
