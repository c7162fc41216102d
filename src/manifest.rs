//! Build Plan - the validated output of a manifest load
//!
//! A `Manifest` is built once by the step converter and is read-only
//! afterwards. Back-references are indices: a `Step` knows the id of the
//! manifest that owns it, an `Artefact` knows the order of its step.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::hashing::plan_fingerprint;

/// Identity of one loaded plan. Unique per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(Uuid);

impl ManifestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ManifestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Commands run before squashing the image. Needs privileged execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleanup {
    pub commands: Vec<String>,
}

impl Cleanup {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artefact {
    pub order: usize,
    /// Order of the owning step.
    pub step: usize,
    pub source: String,
    /// Destination folder only. The file name comes from the source.
    pub dest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub order: usize,
    pub name: String,
    pub dockerfile: String,
    pub artefacts: Vec<Artefact>,
    pub cleanup: Cleanup,
    #[serde(skip)]
    pub manifest: ManifestId,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    id: ManifestId,
    workdir: String,
    steps: Vec<Step>,
    is_privileged: bool,
}

impl Manifest {
    pub(crate) fn new(workdir: impl Into<String>) -> Self {
        Self {
            id: ManifestId::new(),
            workdir: workdir.into(),
            steps: vec![],
            is_privileged: false,
        }
    }

    pub(crate) fn push_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn mark_privileged(&mut self) {
        self.is_privileged = true;
    }

    pub fn id(&self) -> ManifestId {
        self.id
    }

    pub fn workdir(&self) -> &str {
        &self.workdir
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True iff at least one step kept a cleanup block.
    pub fn is_privileged(&self) -> bool {
        self.is_privileged
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Not finding a step is not an error.
    pub fn find_step_by_name(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn step(&self, order: usize) -> Option<&Step> {
        self.steps.get(order)
    }

    /// Resolve an artefact's back-reference to its step.
    pub fn owner_of(&self, artefact: &Artefact) -> Option<&Step> {
        self.step(artefact.step)
    }

    pub fn owns(&self, step: &Step) -> bool {
        step.manifest == self.id
    }

    /// SHA-256 of the plan content. Independent of the per-load id.
    pub fn fingerprint(&self) -> String {
        plan_fingerprint(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(manifest: &Manifest, order: usize, name: &str) -> Step {
        Step {
            order,
            name: name.to_string(),
            dockerfile: "Dockerfile".to_string(),
            artefacts: vec![Artefact {
                order: 0,
                step: order,
                source: format!("/out/{}", name),
                dest: ".".to_string(),
            }],
            cleanup: Cleanup::default(),
            manifest: manifest.id(),
        }
    }

    fn manifest(names: &[&str]) -> Manifest {
        let mut m = Manifest::new("/src");
        for (i, name) in names.iter().enumerate() {
            let s = step(&m, i, name);
            m.push_step(s);
        }
        m
    }

    #[test]
    fn test_find_step_by_name_found_and_missing() {
        let m = manifest(&["a", "b"]);
        assert_eq!(m.find_step_by_name("a").map(|s| s.order), Some(0));
        assert_eq!(m.find_step_by_name("b").map(|s| s.order), Some(1));
        assert!(m.find_step_by_name("missing").is_none());
    }

    #[test]
    fn test_back_references_resolve() {
        let m = manifest(&["a", "b"]);
        let b = m.step(1).unwrap();
        assert!(m.owns(b));
        assert_eq!(m.owner_of(&b.artefacts[0]).map(|s| s.name.as_str()), Some("b"));

        let other = manifest(&["a"]);
        assert!(!other.owns(b));
    }

    #[test]
    fn test_fingerprint_ignores_identity() {
        let a = manifest(&["a", "b"]);
        let b = manifest(&["a", "b"]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = manifest(&["b", "a"]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
