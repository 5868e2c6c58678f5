//! Captured answer values.
//!
//! Raw answers arrive loosely typed (strings, boolean-like strings, numbers, JSON-encoded lists).
//! They are converted once, at the input boundary, into the closed [`AnswerValue`] set using
//! the field's [`FieldType`], so formatting is a total match rather than runtime sniffing.

use crate::components::field::FieldType;
use narrative_wire::RawAnswer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Captured answers keyed by field id. An absent entry means "no answer".
pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// A captured value, typed by the field it answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// A recognised boolean (`true/1/yes`, `false/0/no`).
    Bool(bool),
    /// Free text, or a boolean-field value that is not boolean-like.
    Text(String),
    Number(serde_json::Number),
    /// A single stored option value.
    Single(String),
    /// Selected option values of a checklist.
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Interpret a raw wire answer for a field of type `field_type`.
    ///
    /// Returns `None` for an explicit null, which is treated like an absent answer.
    pub fn from_raw(field_type: FieldType, raw: &RawAnswer) -> Option<Self> {
        let value = match (field_type, raw) {
            (_, RawAnswer::Null) => return None,

            (FieldType::Boolean, RawAnswer::Bool(b)) => AnswerValue::Bool(*b),
            (FieldType::Boolean, RawAnswer::Text(s)) => match parse_bool_like(s) {
                Some(b) => AnswerValue::Bool(b),
                None => AnswerValue::Text(s.clone()),
            },
            (FieldType::Boolean, RawAnswer::Number(n)) => match parse_bool_like(&n.to_string()) {
                Some(b) => AnswerValue::Bool(b),
                None => AnswerValue::Text(n.to_string()),
            },

            (FieldType::Checklist, RawAnswer::List(items)) => {
                AnswerValue::Multi(items.iter().filter_map(json_item_text).collect())
            }
            (FieldType::Checklist, RawAnswer::Text(s)) => {
                AnswerValue::Multi(parse_checklist_text(s))
            }
            (FieldType::Checklist, RawAnswer::Bool(b)) => AnswerValue::Multi(vec![b.to_string()]),
            (FieldType::Checklist, RawAnswer::Number(n)) => {
                AnswerValue::Multi(vec![n.to_string()])
            }

            (FieldType::Dropdown, other) => AnswerValue::Single(raw_text(other)),

            (_, RawAnswer::Number(n)) => AnswerValue::Number(n.clone()),
            (_, other) => AnswerValue::Text(raw_text(other)),
        };
        Some(value)
    }

    /// The value's raw stored form, as compared against `omit_if_values`.
    pub fn raw_text(&self) -> String {
        match self {
            AnswerValue::Bool(b) => b.to_string(),
            AnswerValue::Text(s) | AnswerValue::Single(s) => s.clone(),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Multi(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }
}

/// Recognise boolean-like text (`true/1/yes`, `false/0/no`, case-insensitive).
pub fn parse_bool_like(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a checklist answer stored as text.
///
/// Accepts a JSON list, a JSON scalar (wrapped as a single selection) or a bare value
/// (wrapped). Text that looks like a JSON list but does not parse yields no selection.
pub fn parse_checklist_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items.iter().filter_map(json_item_text).collect(),
        Ok(value) => json_item_text(&value).into_iter().collect(),
        Err(e) if trimmed.starts_with('[') => {
            tracing::warn!("unparsable checklist value {trimmed:?}, using empty selection: {e}");
            Vec::new()
        }
        Err(_) => vec![trimmed.to_string()],
    }
}

fn json_item_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn raw_text(raw: &RawAnswer) -> String {
    match raw {
        RawAnswer::Null => String::new(),
        RawAnswer::Bool(b) => b.to_string(),
        RawAnswer::Number(n) => n.to_string(),
        RawAnswer::Text(s) => s.clone(),
        RawAnswer::List(items) => serde_json::to_string(items).unwrap_or_default(),
    }
}
