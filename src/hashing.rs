//! Plan Fingerprints - SHA-256 over the plan's own fields
//!
//! Executors compare fingerprints to tell whether a reloaded plan changed.
//! Every variable-length field is length-prefixed so that adjacent fields
//! cannot run into each other ("ab"+"c" differs from "a"+"bc").

use sha2::{Digest, Sha256};

use crate::manifest::{Manifest, Step};

/// Hashes plan content in declaration order.
pub struct PlanHasher {
    hasher: Sha256,
}

impl PlanHasher {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    fn count(&mut self, n: usize) {
        self.hasher.update((n as u64).to_le_bytes());
    }

    fn field(&mut self, value: &str) {
        self.count(value.len());
        self.hasher.update(value.as_bytes());
    }

    fn flag(&mut self, value: bool) {
        self.hasher.update([u8::from(value)]);
    }

    pub fn step(&mut self, step: &Step) {
        self.field(&step.name);
        self.field(&step.dockerfile);

        self.count(step.artefacts.len());
        for artefact in &step.artefacts {
            self.field(&artefact.source);
            self.field(&artefact.dest);
        }

        self.count(step.cleanup.commands.len());
        for command in &step.cleanup.commands {
            self.field(command);
        }
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Default for PlanHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint of a whole plan. The per-load id is not part of it.
pub fn plan_fingerprint(manifest: &Manifest) -> String {
    let mut hasher = PlanHasher::new();
    hasher.field(manifest.workdir());
    hasher.flag(manifest.is_privileged());
    hasher.count(manifest.len());
    for step in manifest.steps() {
        hasher.step(step);
    }
    hasher.finish()
}
