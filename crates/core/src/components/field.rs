//! Field descriptor domain model.
//!
//! A field descriptor is one question of a reporting profile: how its captured value is
//! formatted, when it is omitted and which output bucket its sentence lands in.

use crate::{NarrativeError, NarrativeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a captured value is interpreted and displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    ShortText,
    LongText,
    Number,
    Dropdown,
    Checklist,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::ShortText => "short_text",
            FieldType::LongText => "long_text",
            FieldType::Number => "number",
            FieldType::Dropdown => "dropdown",
            FieldType::Checklist => "checklist",
        }
    }
}

impl FromStr for FieldType {
    type Err = NarrativeError;

    fn from_str(s: &str) -> NarrativeResult<Self> {
        match s.trim() {
            "boolean" => Ok(FieldType::Boolean),
            "short_text" => Ok(FieldType::ShortText),
            "long_text" => Ok(FieldType::LongText),
            "number" => Ok(FieldType::Number),
            "dropdown" => Ok(FieldType::Dropdown),
            "checklist" => Ok(FieldType::Checklist),
            other => Err(NarrativeError::InvalidInput(format!(
                "unknown field type: {other}"
            ))),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output bucket a rendered sentence is routed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    #[default]
    Finding,
    ImpressionHint,
    LimitationHint,
    Ignore,
}

impl FromStr for FieldRole {
    type Err = NarrativeError;

    fn from_str(s: &str) -> NarrativeResult<Self> {
        match s.trim() {
            "finding" => Ok(FieldRole::Finding),
            "impression_hint" => Ok(FieldRole::ImpressionHint),
            "limitation_hint" => Ok(FieldRole::LimitationHint),
            "ignore" => Ok(FieldRole::Ignore),
            other => Err(NarrativeError::InvalidInput(format!(
                "unknown field role: {other}"
            ))),
        }
    }
}

/// One selectable choice of a dropdown or checklist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One question in a reporting profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable identifier, unique within a profile.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Grouping key; first appearance in the profile is display order.
    pub section: String,
    /// Tie-break within a section.
    pub order: i64,
    pub field_type: FieldType,
    pub unit: Option<String>,
    pub sentence_template: Option<String>,
    pub role: FieldRole,
    /// Raw values that suppress the field. `None` means "omit when empty-equivalent".
    pub omit_if_values: Option<Vec<String>>,
    pub options: Vec<FieldOption>,
    pub join_label: Option<String>,
}

impl FieldDescriptor {
    /// Create a `finding` field with no unit, template, options or omission list.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        section: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            section: section.into(),
            order: 0,
            field_type,
            unit: None,
            sentence_template: None,
            role: FieldRole::Finding,
            omit_if_values: None,
            options: Vec::new(),
            join_label: None,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.sentence_template = Some(template.into());
        self
    }

    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_omit_if_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.omit_if_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_join_label(mut self, join_label: impl Into<String>) -> Self {
        self.join_label = Some(join_label.into());
        self
    }

    /// Display label for a stored option value, if the option still exists.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}
