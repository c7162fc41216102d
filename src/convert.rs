//! Step Conversion
//!
//! Turns the parsed build file into an ordered, validated `Manifest`.

use crate::artefact::parse_artefact;
use crate::error::LoadError;
use crate::manifest::{Artefact, Cleanup, Manifest, Step};
use crate::parser::{BuildFile, StepFile};

#[derive(Debug, Clone, Copy, Default)]
pub struct StepConverter {
    no_squash: bool,
}

impl StepConverter {
    pub fn new(no_squash: bool) -> Self {
        Self { no_squash }
    }

    /// Steps keep declaration order. The first repeated name aborts the
    /// conversion; later steps are never looked at.
    pub fn convert(&self, build: BuildFile) -> Result<Manifest, LoadError> {
        let mut manifest = Manifest::new(build.workdir);

        for (order, raw) in build.steps.into_iter().enumerate() {
            let (step, privileged) = self.convert_step(&manifest, order, raw);

            // Only compares against steps already appended.
            if manifest.steps().iter().any(|s| s.name == step.name) {
                return Err(LoadError::DuplicateStep(step.name));
            }

            if privileged {
                manifest.mark_privileged();
            }

            tracing::debug!(
                order = step.order,
                name = %step.name,
                artefacts = step.artefacts.len(),
                cleanup = step.cleanup.commands.len(),
                "Converted build step"
            );
            manifest.push_step(step);
        }

        Ok(manifest)
    }

    fn convert_step(&self, manifest: &Manifest, order: usize, raw: StepFile) -> (Step, bool) {
        let cleanup = match raw.cleanup {
            Some(c) if !c.commands.is_empty() && !self.no_squash => Cleanup {
                commands: c.commands,
            },
            _ => Cleanup::default(),
        };
        let privileged = !cleanup.is_empty();

        let artefacts = raw
            .artefacts
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let parsed = parse_artefact(spec);
                Artefact {
                    order: idx,
                    step: order,
                    source: parsed.source,
                    dest: parsed.dest,
                }
            })
            .collect();

        let step = Step {
            order,
            name: raw.name,
            dockerfile: raw.dockerfile,
            artefacts,
            cleanup,
            manifest: manifest.id(),
        };
        (step, privileged)
    }
}
