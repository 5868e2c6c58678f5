//! Freeform paragraph composer.
//!
//! Titled sections of raw lines are flattened into [`NarrativeAtom`]s, grouped by organ and
//! rendered as one short paragraph per organ in canonical body order, whatever order the
//! input sections arrived in.

pub mod atoms;
pub mod paragraph;

pub use atoms::{sections_to_atoms, AtomKind, NarrativeAtom, Organ, Side};
pub use paragraph::{compose_organ_paragraph, compress_negatives, dedupe_atoms};

use crate::components::section::TitledSection;
use crate::config::NarrativeConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The paragraph composed for one organ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganParagraph {
    pub organ: Organ,
    pub label: String,
    pub paragraph: String,
}

/// Composer output: ordered organ paragraphs and their plain-text rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedNarrative {
    pub narrative_by_organ: Vec<OrganParagraph>,
    /// One `"{label}: {paragraph}"` line per organ.
    pub narrative_text: String,
}

impl ComposedNarrative {
    pub fn is_empty(&self) -> bool {
        self.narrative_by_organ.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParagraphComposer {
    config: NarrativeConfig,
}

impl ParagraphComposer {
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    pub fn compose(&self, sections: &[TitledSection]) -> ComposedNarrative {
        self.compose_atoms(sections_to_atoms(sections))
    }

    /// Compose already-classified atoms. Organs with nothing to say are left out.
    pub fn compose_atoms(&self, atoms: Vec<NarrativeAtom>) -> ComposedNarrative {
        let atom_count = atoms.len();
        let mut by_organ: BTreeMap<Organ, Vec<NarrativeAtom>> = BTreeMap::new();
        for atom in atoms {
            by_organ.entry(atom.organ).or_default().push(atom);
        }

        let mut narrative_by_organ = Vec::new();
        for organ in Organ::CANONICAL {
            let Some(group) = by_organ.get(&organ) else {
                continue;
            };
            let paragraph = compose_organ_paragraph(organ, group, &self.config);
            if paragraph.is_empty() {
                continue;
            }
            narrative_by_organ.push(OrganParagraph {
                organ,
                label: organ.label().to_string(),
                paragraph,
            });
        }

        tracing::debug!(
            "composed {} atoms into {} organ paragraphs",
            atom_count,
            narrative_by_organ.len()
        );

        let narrative_text = narrative_by_organ
            .iter()
            .map(|p| format!("{}: {}", p.label, p.paragraph))
            .collect::<Vec<_>>()
            .join("\n");

        ComposedNarrative {
            narrative_by_organ,
            narrative_text,
        }
    }
}
