//! # Narrative Core
//!
//! Deterministic clinical narrative synthesis for structured imaging reports.
//!
//! Two layered stages:
//! - **Field narrative generator**: turns a profile's field descriptors and captured answers into
//!   grouped findings text plus impression and limitation lines.
//! - **Paragraph composer**: turns titled sections of raw lines into one deduplicated paragraph
//!   per organ, in canonical body order.
//!
//! Both stages are pure and total. Identical input always produces byte-identical output, and
//! malformed pieces degrade (with a `tracing` warning) instead of failing the report.
//!
//! **No I/O**: reading documents belongs to `narrative-wire` and the `narrate` binary.

pub mod components;
pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod profile;
pub mod report;
pub mod template;
pub mod text;

pub use components::answer::{AnswerMap, AnswerValue};
pub use components::field::{FieldDescriptor, FieldOption, FieldRole, FieldType};
pub use components::section::{SectionLine, TitledSection};
pub use composer::{
    AtomKind, ComposedNarrative, NarrativeAtom, Organ, OrganParagraph, ParagraphComposer, Side,
};
pub use config::{config_from_env_values, NarrativeConfig};
pub use error::{NarrativeError, NarrativeResult, TemplateError};
pub use generator::{FieldNarrativeGenerator, FindingSection, NarrativeOutput, RenderedSentence};
pub use profile::ReportInput;
pub use report::{ReportNarrative, ReportSynthesizer};

/// Run the field generator with the default configuration.
pub fn generate(fields: &[FieldDescriptor], answers: &AnswerMap) -> NarrativeOutput {
    FieldNarrativeGenerator::default().generate(fields, answers)
}

/// Run the paragraph composer with the default configuration.
pub fn compose(sections: &[TitledSection]) -> ComposedNarrative {
    ParagraphComposer::default().compose(sections)
}

/// Run both stages with the default configuration.
pub fn synthesize(
    fields: &[FieldDescriptor],
    answers: &AnswerMap,
    extra_sections: &[TitledSection],
) -> ReportNarrative {
    ReportSynthesizer::default().synthesize(fields, answers, extra_sections)
}
