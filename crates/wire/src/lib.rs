//! Wire/boundary support for the narrative engine.
//!
//! This crate translates between on-disk YAML/JSON documents and plain wire structs:
//! - reporting profiles (ordered field descriptors)
//! - answer sets (field id to loosely typed captured value)
//! - titled sections of freeform text lines
//! - combined report requests bundling all three
//!
//! Narrative meaning lives in `narrative-core`. This crate handles file formats only and does
//! not depend on the core (to avoid cycles); field types and roles stay as strings here and are
//! validated during translation into domain types.

pub mod answers;
pub mod profile;
pub mod request;
pub mod sections;

pub use answers::{AnswerSet, RawAnswer, ScalarWire};
pub use profile::{FieldOptionWire, FieldWire, Profile, ProfileWire};
pub use request::{ReportRequest, ReportRequestWire};
pub use sections::{KeyedLineWire, LineWire, SectionWire, Sections};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Errors returned by the `narrative-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// Document encoding understood by the readers in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    Yaml,
    Json,
}

impl WireFormat {
    /// Pick a format from a file extension: `.json` is JSON, anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => WireFormat::Json,
            _ => WireFormat::Yaml,
        }
    }
}

/// Strictly parse `text` into `T`, reporting the failing path on schema mismatch.
///
/// `what` names the document kind in error messages (for example "Profile").
pub(crate) fn parse_document<T: DeserializeOwned>(
    text: &str,
    format: WireFormat,
    what: &str,
) -> WireResult<T> {
    match format {
        WireFormat::Yaml => {
            let deserializer = serde_yaml::Deserializer::from_str(text);
            serde_path_to_error::deserialize::<_, T>(deserializer)
                .map_err(|err| schema_mismatch(what, err.path().to_string(), err.into_inner()))
        }
        WireFormat::Json => {
            let mut deserializer = serde_json::Deserializer::from_str(text);
            let parsed = serde_path_to_error::deserialize::<_, T>(&mut deserializer)
                .map_err(|err| schema_mismatch(what, err.path().to_string(), err.into_inner()))?;
            deserializer.end()?;
            Ok(parsed)
        }
    }
}

/// Render `value` in the requested format.
pub(crate) fn render_document<T: Serialize>(value: &T, format: WireFormat) -> WireResult<String> {
    match format {
        WireFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        WireFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn schema_mismatch(what: &str, path: String, source: impl std::fmt::Display) -> WireError {
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    WireError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
