//! Translation of wire documents into engine inputs.
//!
//! The wire crate only checks document shape. Everything that needs domain knowledge
//! (field types, roles, id uniqueness, type-directed answer interpretation) happens here, so the
//! generator and composer only ever see well-formed values.

use crate::components::answer::{AnswerMap, AnswerValue};
use crate::components::field::{FieldDescriptor, FieldOption, FieldRole, FieldType};
use crate::components::section::{SectionLine, TitledSection};
use crate::error::{NarrativeError, NarrativeResult};
use narrative_wire::{AnswerSet, FieldWire, LineWire, ProfileWire, ReportRequestWire, SectionWire};
use std::collections::{HashMap, HashSet};

/// Translate one wire field.
///
/// # Errors
///
/// Returns `NarrativeError::InvalidInput` if the id is blank or the type or role is unknown.
pub fn field_from_wire(wire: &FieldWire) -> NarrativeResult<FieldDescriptor> {
    let id = wire.id.trim();
    if id.is_empty() {
        return Err(NarrativeError::InvalidInput("field id cannot be empty".into()));
    }

    let field_type: FieldType = wire
        .field_type
        .parse()
        .map_err(|e| NarrativeError::InvalidInput(format!("field {id}: {e}")))?;
    let role: FieldRole = wire
        .role
        .parse()
        .map_err(|e| NarrativeError::InvalidInput(format!("field {id}: {e}")))?;

    Ok(FieldDescriptor {
        id: id.to_string(),
        name: wire.name.clone(),
        section: wire.section.clone(),
        order: wire.order,
        field_type,
        unit: wire.unit.clone(),
        sentence_template: wire.sentence_template.clone(),
        role,
        omit_if_values: wire
            .omit_if_values
            .as_ref()
            .map(|values| values.iter().map(|v| v.to_text()).collect()),
        options: wire
            .options
            .iter()
            .map(|o| FieldOption::new(o.label.clone(), o.value.clone()))
            .collect(),
        join_label: wire.join_label.clone(),
    })
}

/// Translate a list of wire fields, rejecting duplicate ids.
pub fn fields_from_wire(wires: &[FieldWire]) -> NarrativeResult<Vec<FieldDescriptor>> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(wires.len());
    for wire in wires {
        let field = field_from_wire(wire)?;
        if !seen.insert(field.id.clone()) {
            return Err(NarrativeError::InvalidInput(format!(
                "duplicate field id: {}",
                field.id
            )));
        }
        fields.push(field);
    }
    Ok(fields)
}

pub fn profile_fields(profile: &ProfileWire) -> NarrativeResult<Vec<FieldDescriptor>> {
    fields_from_wire(&profile.fields)
}

/// Interpret raw answers using the type of the field each one answers.
///
/// Answers for ids not present in `fields` can never be rendered and are dropped. Explicit
/// nulls are dropped as well, which makes them equivalent to an absent answer.
pub fn answers_from_wire(fields: &[FieldDescriptor], answers: &AnswerSet) -> AnswerMap {
    let types: HashMap<&str, FieldType> = fields
        .iter()
        .map(|field| (field.id.as_str(), field.field_type))
        .collect();

    let mut map = AnswerMap::new();
    for (id, raw) in &answers.0 {
        let Some(&field_type) = types.get(id.as_str()) else {
            tracing::debug!("ignoring answer for unknown field {}", id);
            continue;
        };
        if let Some(value) = AnswerValue::from_raw(field_type, raw) {
            map.insert(id.clone(), value);
        }
    }
    map
}

pub fn sections_from_wire(wires: &[SectionWire]) -> Vec<TitledSection> {
    wires
        .iter()
        .map(|section| TitledSection {
            title: section.title.clone(),
            lines: section.lines.iter().map(line_from_wire).collect(),
        })
        .collect()
}

fn line_from_wire(line: &LineWire) -> SectionLine {
    SectionLine {
        text: line.text().to_string(),
        source_key: line.source_key().map(str::to_string),
    }
}

/// Everything the report pipeline needs, translated and validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportInput {
    pub fields: Vec<FieldDescriptor>,
    pub answers: AnswerMap,
    pub sections: Vec<TitledSection>,
}

impl ReportInput {
    /// Translate a combined report request.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::InvalidInput` for any field that fails [`fields_from_wire`].
    pub fn from_wire(request: &ReportRequestWire) -> NarrativeResult<Self> {
        let fields = fields_from_wire(&request.fields)?;
        let answers = answers_from_wire(&fields, &request.answers);
        Ok(Self {
            fields,
            answers,
            sections: sections_from_wire(&request.sections),
        })
    }
}
