//! Report pipeline: the field generator followed by the paragraph composer.

use crate::components::answer::AnswerMap;
use crate::components::field::FieldDescriptor;
use crate::components::section::TitledSection;
use crate::composer::{OrganParagraph, ParagraphComposer};
use crate::config::NarrativeConfig;
use crate::generator::FieldNarrativeGenerator;
use crate::profile::ReportInput;
use serde::{Deserialize, Serialize};

/// Everything a printed report needs from the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNarrative {
    pub findings_text: String,
    pub impression_text: String,
    pub limitations_text: String,
    pub narrative_by_organ: Vec<OrganParagraph>,
    pub narrative_text: String,
}

/// Runs both stages with one shared configuration.
#[derive(Clone, Debug, Default)]
pub struct ReportSynthesizer {
    generator: FieldNarrativeGenerator,
    composer: ParagraphComposer,
}

impl ReportSynthesizer {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            generator: FieldNarrativeGenerator::new(config.clone()),
            composer: ParagraphComposer::new(config),
        }
    }

    /// Generate field sentences, then compose organ paragraphs from the generator's finding
    /// sections followed by `extra_sections`.
    pub fn synthesize(
        &self,
        fields: &[FieldDescriptor],
        answers: &AnswerMap,
        extra_sections: &[TitledSection],
    ) -> ReportNarrative {
        let output = self.generator.generate(fields, answers);

        let mut sections = output.to_titled_sections();
        sections.extend_from_slice(extra_sections);
        let composed = self.composer.compose(&sections);

        ReportNarrative {
            findings_text: output.findings_text,
            impression_text: output.impression_text,
            limitations_text: output.limitations_text,
            narrative_by_organ: composed.narrative_by_organ,
            narrative_text: composed.narrative_text,
        }
    }

    pub fn synthesize_input(&self, input: &ReportInput) -> ReportNarrative {
        self.synthesize(&input.fields, &input.answers, &input.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::answer::AnswerValue;
    use crate::components::field::{FieldRole, FieldType};
    use crate::composer::Organ;

    fn number(value: f64) -> AnswerValue {
        AnswerValue::Number(serde_json::Number::from_f64(value).expect("finite"))
    }

    fn abdomen_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("liv_span", "Liver span", "Liver", FieldType::Number)
                .with_unit("cm")
                .with_template("Liver span measures {value}{unit}."),
            FieldDescriptor::new("kid_r_len", "Right kidney", "Right Kidney", FieldType::Number)
                .with_unit("cm")
                .with_template("Right kidney measures {value}{unit}."),
            FieldDescriptor::new("kid_l_len", "Left kidney", "Left Kidney", FieldType::Number)
                .with_unit("cm")
                .with_template("Left kidney measures {value}{unit}."),
            FieldDescriptor::new("summary", "Summary", "Impression", FieldType::ShortText)
                .with_role(FieldRole::ImpressionHint)
                .with_template("{value}"),
            FieldDescriptor::new("gas", "Bowel gas", "Limitations", FieldType::Boolean)
                .with_role(FieldRole::LimitationHint)
                .with_template("Views limited by bowel gas."),
        ]
    }

    fn abdomen_answers() -> AnswerMap {
        AnswerMap::from([
            ("liv_span".to_string(), number(14.5)),
            ("kid_r_len".to_string(), number(10.2)),
            ("kid_l_len".to_string(), number(9.8)),
            (
                "summary".to_string(),
                AnswerValue::Text("Normal abdominal ultrasound.".to_string()),
            ),
            ("gas".to_string(), AnswerValue::Bool(true)),
        ])
    }

    #[test]
    fn synthesizes_all_report_sections() {
        let extra = vec![TitledSection::new("Abdomen", ["No ascites."])];
        let report =
            ReportSynthesizer::default().synthesize(&abdomen_fields(), &abdomen_answers(), &extra);

        assert_eq!(
            report.findings_text,
            "Left Kidney:\n- Left kidney measures 9.8 cm.\n\n\
             Liver:\n- Liver span measures 14.5 cm.\n\n\
             Right Kidney:\n- Right kidney measures 10.2 cm."
        );
        assert_eq!(report.impression_text, "Normal abdominal ultrasound.");
        assert_eq!(report.limitations_text, "Views limited by bowel gas.");

        let organs: Vec<Organ> = report.narrative_by_organ.iter().map(|p| p.organ).collect();
        assert_eq!(organs, vec![Organ::Liver, Organ::Kidneys, Organ::Peritoneum]);
        assert_eq!(
            report.narrative_text,
            "Liver: The liver span measures 14.5 cm.\n\
             Kidneys: Both kidneys measure 10.2 cm (right) and 9.8 cm (left).\n\
             Peritoneum: No ascites."
        );
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = ReportSynthesizer::default().synthesize(&[], &AnswerMap::new(), &[]);
        assert_eq!(report, ReportNarrative::default());
    }

    #[test]
    fn synthesis_is_idempotent() {
        let synthesizer = ReportSynthesizer::default();
        let first = synthesizer.synthesize(&abdomen_fields(), &abdomen_answers(), &[]);
        let second = synthesizer.synthesize(&abdomen_fields(), &abdomen_answers(), &[]);
        assert_eq!(first, second);
    }
}
