//! Answer set wire model.
//!
//! Captured answers are stored loosely typed: a string, a boolean, a number, a list (for
//! checklists) or null. The core converts each raw answer into a closed value type using the
//! field descriptor's type; nothing here interprets the values.

use crate::{parse_document, render_document, WireFormat, WireResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single captured value as it appears on disk.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RawAnswer {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<serde_json::Value>),
}

/// A scalar literal, used for `omit_if_values` entries.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ScalarWire {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl ScalarWire {
    /// Textual form used for comparisons (`true`, `12.5`, `none`).
    pub fn to_text(&self) -> String {
        match self {
            ScalarWire::Bool(b) => b.to_string(),
            ScalarWire::Number(n) => n.to_string(),
            ScalarWire::Text(s) => s.clone(),
        }
    }
}

/// Map of field id to captured value.
///
/// A `BTreeMap` keeps rendering deterministic; lookup order does not affect narrative output.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct AnswerSet(pub BTreeMap<String, RawAnswer>);

impl AnswerSet {
    /// Parse an answer set document (a top-level mapping).
    ///
    /// # Errors
    ///
    /// Returns [`crate::WireError`] if the document is not a mapping of ids to values.
    pub fn parse(text: &str, format: WireFormat) -> WireResult<Self> {
        parse_document(text, format, "Answer set")
    }

    /// Render an answer set document.
    pub fn render(&self, format: WireFormat) -> WireResult<String> {
        render_document(self, format)
    }

    pub fn get(&self, id: &str) -> Option<&RawAnswer> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_yaml_answers() {
        let yaml = "gbl_stones: true\nliv_span: 14.5\nliv_echo: normal\nkid_sides: [right, left]\nasc_note: ~\n";
        let answers = AnswerSet::parse(yaml, WireFormat::Yaml).expect("parse");

        assert_eq!(answers.len(), 5);
        assert_eq!(answers.get("gbl_stones"), Some(&RawAnswer::Bool(true)));
        assert!(matches!(answers.get("liv_span"), Some(RawAnswer::Number(n)) if n.to_string() == "14.5"));
        assert_eq!(
            answers.get("liv_echo"),
            Some(&RawAnswer::Text("normal".to_string()))
        );
        assert!(matches!(answers.get("kid_sides"), Some(RawAnswer::List(items)) if items.len() == 2));
        assert_eq!(answers.get("asc_note"), Some(&RawAnswer::Null));
    }

    #[test]
    fn parses_json_answers_with_encoded_checklist() {
        let json = r#"{"kid_sides": "[\"right\",\"left\"]", "gbl_stones": "false"}"#;
        let answers = AnswerSet::parse(json, WireFormat::Json).expect("parse");
        assert_eq!(
            answers.get("kid_sides"),
            Some(&RawAnswer::Text(r#"["right","left"]"#.to_string()))
        );
        assert_eq!(
            answers.get("gbl_stones"),
            Some(&RawAnswer::Text("false".to_string()))
        );
    }

    #[test]
    fn rejects_non_mapping_document() {
        assert!(AnswerSet::parse("- a\n- b\n", WireFormat::Yaml).is_err());
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(ScalarWire::Bool(false).to_text(), "false");
        assert_eq!(ScalarWire::Text("none".into()).to_text(), "none");
        assert_eq!(
            ScalarWire::Number(serde_json::Number::from(3u64)).to_text(),
            "3"
        );
    }
}
