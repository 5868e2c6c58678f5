//! Titled sections of freeform narrative lines (composer input).

use serde::{Deserialize, Serialize};

/// One raw line of narrative text, optionally tagged with the field it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLine {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
}

impl SectionLine {
    pub fn keyed(text: impl Into<String>, source_key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_key: Some(source_key.into()),
        }
    }
}

impl From<&str> for SectionLine {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source_key: None,
        }
    }
}

impl From<String> for SectionLine {
    fn from(text: String) -> Self {
        Self {
            text,
            source_key: None,
        }
    }
}

/// A titled group of raw lines, e.g. `"Right Kidney"` with its finding lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledSection {
    pub title: String,

    #[serde(default)]
    pub lines: Vec<SectionLine>,
}

impl TitledSection {
    pub fn new<I, L>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<SectionLine>,
    {
        Self {
            title: title.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}
