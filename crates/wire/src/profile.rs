//! Reporting profile wire model.
//!
//! A profile is an ordered list of field descriptors. Field `type` and `role` are kept as
//! strings in the wire model; `narrative-core` validates them when translating into domain
//! descriptors so an unknown value is reported with the offending field id.

use crate::answers::ScalarWire;
use crate::{parse_document, render_document, WireFormat, WireResult};
use serde::{Deserialize, Serialize};

/// On-disk representation of a reporting profile.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldWire>,
}

/// On-disk representation of a single field descriptor.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldWire {
    pub id: String,
    pub name: String,
    pub section: String,

    #[serde(default)]
    pub order: i64,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_template: Option<String>,

    #[serde(default = "default_role")]
    pub role: String,

    /// Explicit omission list. `None` means "omit when empty-equivalent".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_if_values: Option<Vec<ScalarWire>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOptionWire>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_label: Option<String>,
}

fn default_role() -> String {
    "finding".to_string()
}

/// One `{label, value}` choice of a dropdown or checklist field.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldOptionWire {
    pub label: String,
    pub value: String,
}

/// Profile document operations.
///
/// This is a zero-sized type used for namespacing profile-related operations.
pub struct Profile;

impl Profile {
    /// Parse a profile document.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g. `fields[2].type`)
    /// to the failing field when the document does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WireError`] if the document is malformed, a field has an unexpected
    /// type, or unknown keys are present.
    pub fn parse(text: &str, format: WireFormat) -> WireResult<ProfileWire> {
        parse_document(text, format, "Profile")
    }

    /// Render a profile document.
    pub fn render(profile: &ProfileWire, format: WireFormat) -> WireResult<String> {
        render_document(profile, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WireError;

    const PROFILE_YAML: &str = r#"
name: Abdominal ultrasound
fields:
  - id: liv_echo
    name: Liver echotexture
    section: Liver
    order: 1
    type: dropdown
    options:
      - { label: Normal, value: normal }
      - { label: Coarse, value: coarse }
  - id: gbl_stones
    name: Gallstones
    section: Gallbladder
    type: boolean
    sentence_template: "Gallstones: {value}."
    omit_if_values: [false]
"#;

    #[test]
    fn parses_yaml_profile_with_defaults() {
        let profile = Profile::parse(PROFILE_YAML, WireFormat::Yaml).expect("parse");
        assert_eq!(profile.name.as_deref(), Some("Abdominal ultrasound"));
        assert_eq!(profile.fields.len(), 2);

        let liver = &profile.fields[0];
        assert_eq!(liver.field_type, "dropdown");
        assert_eq!(liver.role, "finding");
        assert_eq!(liver.options[1].label, "Coarse");

        let stones = &profile.fields[1];
        assert_eq!(stones.order, 0);
        assert_eq!(
            stones.omit_if_values,
            Some(vec![ScalarWire::Bool(false)])
        );
    }

    #[test]
    fn parses_json_profile() {
        let json = r#"{"fields":[{"id":"spl_size","name":"Spleen size","section":"Spleen","type":"number","unit":"cm"}]}"#;
        let profile = Profile::parse(json, WireFormat::Json).expect("parse");
        assert_eq!(profile.fields[0].unit.as_deref(), Some("cm"));
    }

    #[test]
    fn reports_path_of_schema_mismatch() {
        let yaml = "fields:\n  - id: a\n    name: A\n    section: S\n    type: number\n    colour: red\n";
        let err = Profile::parse(yaml, WireFormat::Yaml).expect_err("unknown key");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.starts_with("Profile schema mismatch at fields[0]"), "{msg}");
                assert!(msg.contains("colour"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn render_then_parse_keeps_fields() {
        let profile = Profile::parse(PROFILE_YAML, WireFormat::Yaml).expect("parse");
        let json = Profile::render(&profile, WireFormat::Json).expect("render");
        let reparsed = Profile::parse(&json, WireFormat::Json).expect("reparse");
        assert_eq!(reparsed, profile);
    }
}
