//! Field narrative generator.
//!
//! Turns a profile's field descriptors and captured answers into grouped findings text plus
//! flat impression and limitation lines. Generation is total: a field whose template cannot be
//! formatted degrades to a minimal `"{name}: {value}"` sentence and the rest of the report is
//! unaffected.

use crate::components::answer::{parse_bool_like, parse_checklist_text, AnswerMap, AnswerValue};
use crate::components::field::{FieldDescriptor, FieldRole, FieldType};
use crate::components::section::{SectionLine, TitledSection};
use crate::config::NarrativeConfig;
use crate::constants::NOT_APPLICABLE;
use crate::template::{render_template, TemplateContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A display value and whether it counts as "nothing to say" for default omission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedValue {
    pub text: String,
    pub is_empty: bool,
}

impl FormattedValue {
    fn new(text: impl Into<String>, is_empty: bool) -> Self {
        Self {
            text: text.into(),
            is_empty,
        }
    }

    fn empty() -> Self {
        Self::new("", true)
    }
}

/// A rendered sentence and the field that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSentence {
    pub field_id: String,
    pub text: String,
}

/// Finding sentences of one section, in render order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSection {
    pub title: String,
    pub sentences: Vec<RenderedSentence>,
}

/// Generator output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeOutput {
    pub findings_text: String,
    pub impression_text: String,
    pub limitations_text: String,
    /// The grouped findings behind `findings_text`.
    pub sections: Vec<FindingSection>,
}

impl NarrativeOutput {
    pub fn is_empty(&self) -> bool {
        self.findings_text.is_empty()
            && self.impression_text.is_empty()
            && self.limitations_text.is_empty()
    }

    /// Degrade the finding sections to composer input, keyed by originating field id.
    pub fn to_titled_sections(&self) -> Vec<TitledSection> {
        self.sections
            .iter()
            .map(|section| TitledSection {
                title: section.title.clone(),
                lines: section
                    .sentences
                    .iter()
                    .map(|s| SectionLine::keyed(s.text.clone(), s.field_id.clone()))
                    .collect(),
            })
            .collect()
    }
}

/// Generates narrative sentences from field descriptors and answers.
#[derive(Clone, Debug, Default)]
pub struct FieldNarrativeGenerator {
    config: NarrativeConfig,
}

impl FieldNarrativeGenerator {
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Generate findings, impression and limitation text.
    ///
    /// Fields are sorted by `(section, order)`. Sections appear in the findings text in the
    /// order first seen in that sorted sequence, so the descriptor list order is irrelevant.
    pub fn generate(&self, fields: &[FieldDescriptor], answers: &AnswerMap) -> NarrativeOutput {
        let mut sections: Vec<FindingSection> = Vec::new();
        let mut section_index: HashMap<&str, usize> = HashMap::new();
        let mut impressions: Vec<String> = Vec::new();
        let mut limitations: Vec<String> = Vec::new();

        for field in order_fields(fields) {
            if field.role == FieldRole::Ignore {
                continue;
            }

            let Some(sentence) = self.render_field(field, answers.get(&field.id)) else {
                continue;
            };

            match field.role {
                FieldRole::Finding => {
                    let index = *section_index
                        .entry(field.section.as_str())
                        .or_insert_with(|| {
                            sections.push(FindingSection {
                                title: field.section.clone(),
                                sentences: Vec::new(),
                            });
                            sections.len() - 1
                        });
                    sections[index].sentences.push(RenderedSentence {
                        field_id: field.id.clone(),
                        text: sentence,
                    });
                }
                FieldRole::ImpressionHint => impressions.push(sentence),
                FieldRole::LimitationHint => limitations.push(sentence),
                FieldRole::Ignore => {}
            }
        }

        NarrativeOutput {
            findings_text: findings_text(&sections),
            impression_text: impressions.join("\n"),
            limitations_text: limitations.join("\n"),
            sections,
        }
    }

    /// Render one field to a sentence, or `None` when the field is omitted.
    pub fn render_field(
        &self,
        field: &FieldDescriptor,
        answer: Option<&AnswerValue>,
    ) -> Option<String> {
        let formatted = format_value(field, answer, self.config.default_join_label());
        if should_omit(field, answer, &formatted) {
            tracing::debug!("omitting field {}", field.id);
            return None;
        }

        let template = field
            .sentence_template
            .as_deref()
            .unwrap_or(self.config.fallback_template());
        let ctx = TemplateContext {
            name: &field.name,
            value: &formatted.text,
            unit: field.unit.as_deref(),
            section: &field.section,
        };

        let sentence = match render_template(template, &ctx) {
            Ok(sentence) => sentence,
            Err(e) => {
                tracing::warn!(
                    "sentence template for field {} failed, using fallback: {}",
                    field.id,
                    e
                );
                format!("{}: {}", field.name, formatted.text)
            }
        };

        Some(sentence.trim().to_string())
    }
}

/// Format a captured value for display according to the field type.
///
/// `default_join_label` separates checklist labels when the field has no `join_label`.
pub fn format_value(
    field: &FieldDescriptor,
    answer: Option<&AnswerValue>,
    default_join_label: &str,
) -> FormattedValue {
    let Some(answer) = answer else {
        return FormattedValue::empty();
    };

    match field.field_type {
        FieldType::Boolean => match answer {
            AnswerValue::Bool(true) => FormattedValue::new("Yes", false),
            AnswerValue::Bool(false) => FormattedValue::new("No", true),
            other => {
                let text = other.raw_text();
                let is_empty = text.trim().is_empty();
                FormattedValue::new(text, is_empty)
            }
        },
        FieldType::ShortText | FieldType::LongText | FieldType::Number => {
            let text = answer.raw_text().trim().to_string();
            let is_empty = is_empty_equivalent(&text);
            FormattedValue::new(text, is_empty)
        }
        FieldType::Dropdown => {
            let value = answer.raw_text().trim().to_string();
            if is_empty_equivalent(&value) {
                return FormattedValue::new(value, true);
            }
            FormattedValue::new(option_label_or_raw(field, &value), false)
        }
        FieldType::Checklist => {
            let selected = match answer {
                AnswerValue::Multi(items) => items.clone(),
                other => parse_checklist_text(&other.raw_text()),
            };
            if selected.is_empty() {
                return FormattedValue::empty();
            }
            let labels: Vec<String> = selected
                .iter()
                .map(|value| option_label_or_raw(field, value))
                .collect();
            let join_label = field.join_label.as_deref().unwrap_or(default_join_label);
            FormattedValue::new(labels.join(join_label), false)
        }
    }
}

/// Decide whether a field is suppressed.
///
/// With an explicit `omit_if_values` list, an absent answer is always suppressed and a present
/// one is suppressed only when it matches the list. Without a list, empty-equivalent values
/// are suppressed. A boolean `false` is therefore omitted by default but rendered as `"No"`
/// when a list is set that does not name it.
pub fn should_omit(
    field: &FieldDescriptor,
    answer: Option<&AnswerValue>,
    formatted: &FormattedValue,
) -> bool {
    match (&field.omit_if_values, answer) {
        (Some(_), None) => true,
        (Some(values), Some(answer)) => matches_omit_list(answer, values),
        (None, _) => formatted.is_empty,
    }
}

fn matches_omit_list(answer: &AnswerValue, values: &[String]) -> bool {
    let raw = answer.raw_text();
    values.iter().any(|entry| {
        if entry.trim() == raw.trim() {
            return true;
        }
        match answer {
            AnswerValue::Bool(b) => parse_bool_like(entry) == Some(*b),
            _ => false,
        }
    })
}

fn is_empty_equivalent(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case(NOT_APPLICABLE)
}

fn option_label_or_raw(field: &FieldDescriptor, value: &str) -> String {
    match field.option_label(value) {
        Some(label) => label.to_string(),
        None => {
            if !field.options.is_empty() {
                tracing::debug!(
                    "field {} references unknown option {:?}, using raw value",
                    field.id,
                    value
                );
            }
            value.to_string()
        }
    }
}

/// Stable ordering by (section, order). Sections are first seen in this order, so the
/// position of a descriptor in the profile never affects output.
fn order_fields(fields: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let mut ordered: Vec<&FieldDescriptor> = fields.iter().collect();
    ordered.sort_by(|a, b| (a.section.as_str(), a.order).cmp(&(b.section.as_str(), b.order)));
    ordered
}

fn findings_text(sections: &[FindingSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&section.title);
        out.push_str(":\n");
        for sentence in &section.sentences {
            out.push_str("- ");
            out.push_str(&sentence.text);
            out.push('\n');
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
