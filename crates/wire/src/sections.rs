//! Titled section wire model.
//!
//! Each section carries a title and raw text lines. A line is either a bare string or a
//! `{text, source_key}` mapping when the producing system knows which field the line came from.

use crate::{parse_document, render_document, WireFormat, WireResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SectionWire {
    pub title: String,

    #[serde(default)]
    pub lines: Vec<LineWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LineWire {
    Text(String),
    Keyed(KeyedLineWire),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeyedLineWire {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
}

impl LineWire {
    pub fn text(&self) -> &str {
        match self {
            LineWire::Text(text) => text,
            LineWire::Keyed(line) => &line.text,
        }
    }

    pub fn source_key(&self) -> Option<&str> {
        match self {
            LineWire::Text(_) => None,
            LineWire::Keyed(line) => line.source_key.as_deref(),
        }
    }
}

/// Section list document operations.
pub struct Sections;

impl Sections {
    /// Parse a top-level list of titled sections.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WireError`] on malformed documents or unknown keys, with the failing path.
    pub fn parse(text: &str, format: WireFormat) -> WireResult<Vec<SectionWire>> {
        parse_document(text, format, "Sections")
    }

    pub fn render(sections: &[SectionWire], format: WireFormat) -> WireResult<String> {
        render_document(&sections, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_keyed_lines() {
        let yaml = r#"
- title: Right Kidney
  lines:
    - Right kidney measures 10.2 cm.
    - text: No hydronephrosis
      source_key: kid_r_hydro
- title: Liver
"#;
        let sections = Sections::parse(yaml, WireFormat::Yaml).expect("parse");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].lines[0].text(), "Right kidney measures 10.2 cm.");
        assert_eq!(sections[0].lines[0].source_key(), None);
        assert_eq!(sections[0].lines[1].source_key(), Some("kid_r_hydro"));
        assert!(sections[1].lines.is_empty());
    }

    #[test]
    fn rejects_section_without_title() {
        let err = Sections::parse(r#"[{"lines": ["x"]}]"#, WireFormat::Json).expect_err("title");
        assert!(err.to_string().contains("Sections schema mismatch"), "{err}");
    }
}
