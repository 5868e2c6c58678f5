//! Combined report request wire model.
//!
//! Bundles a profile's fields, the captured answers and any externally supplied titled
//! sections into one document so a whole report can be synthesised from a single file.

use crate::answers::AnswerSet;
use crate::profile::FieldWire;
use crate::sections::SectionWire;
use crate::{parse_document, WireFormat, WireResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportRequestWire {
    #[serde(default)]
    pub fields: Vec<FieldWire>,

    #[serde(default)]
    pub answers: AnswerSet,

    #[serde(default)]
    pub sections: Vec<SectionWire>,
}

/// Report request document operations.
pub struct ReportRequest;

impl ReportRequest {
    /// Parse a report request document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WireError`] on malformed documents or unknown keys, with the failing path.
    pub fn parse(text: &str, format: WireFormat) -> WireResult<ReportRequestWire> {
        parse_document(text, format, "Report request")
    }
}
