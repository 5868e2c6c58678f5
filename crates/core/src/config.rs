//! Engine runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the generator and
//! composer. The core never reads environment variables itself; callers hand over the raw
//! override strings and [`config_from_env_values`] applies defaults and validation.

use crate::constants::{
    DEFAULT_FALLBACK_TEMPLATE, DEFAULT_JOIN_LABEL, DEFAULT_MAX_NEGATIVES, DEFAULT_MAX_SENTENCES,
};
use crate::template::{render_template, TemplateContext};
use crate::{NarrativeError, NarrativeResult};

/// Narrative configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrativeConfig {
    fallback_template: String,
    default_join_label: String,
    max_negatives: usize,
    max_sentences: usize,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_string(),
            default_join_label: DEFAULT_JOIN_LABEL.to_string(),
            max_negatives: DEFAULT_MAX_NEGATIVES,
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

impl NarrativeConfig {
    /// Create a new validated `NarrativeConfig`.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::InvalidInput` if the fallback template is empty or either limit
    /// is zero, and `NarrativeError::Template` if the fallback template does not format.
    pub fn new(
        fallback_template: String,
        default_join_label: String,
        max_negatives: usize,
        max_sentences: usize,
    ) -> NarrativeResult<Self> {
        if fallback_template.trim().is_empty() {
            return Err(NarrativeError::InvalidInput(
                "fallback_template cannot be empty".into(),
            ));
        }

        let probe = TemplateContext {
            name: "Probe",
            value: "value",
            unit: None,
            section: "Section",
        };
        render_template(&fallback_template, &probe)?;

        if max_negatives == 0 {
            return Err(NarrativeError::InvalidInput(
                "max_negatives must be at least 1".into(),
            ));
        }
        if max_sentences == 0 {
            return Err(NarrativeError::InvalidInput(
                "max_sentences must be at least 1".into(),
            ));
        }

        Ok(Self {
            fallback_template,
            default_join_label,
            max_negatives,
            max_sentences,
        })
    }

    pub fn fallback_template(&self) -> &str {
        &self.fallback_template
    }

    pub fn default_join_label(&self) -> &str {
        &self.default_join_label
    }

    pub fn max_negatives(&self) -> usize {
        self.max_negatives
    }

    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }
}

/// Build a [`NarrativeConfig`] from optional string overrides.
///
/// `None` or whitespace-only values fall back to the defaults. The join label is taken
/// verbatim (a separator such as `", "` is meaningful whitespace), other values are trimmed.
pub fn config_from_env_values(
    fallback_template: Option<String>,
    join_label: Option<String>,
    max_negatives: Option<String>,
    max_sentences: Option<String>,
) -> NarrativeResult<NarrativeConfig> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    fn parse_limit(name: &str, value: Option<String>, default: usize) -> NarrativeResult<usize> {
        match non_blank(value) {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                NarrativeError::InvalidInput(format!("{name} must be a positive integer, got {v:?}"))
            }),
            None => Ok(default),
        }
    }

    let defaults = NarrativeConfig::default();

    NarrativeConfig::new(
        non_blank(fallback_template)
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.fallback_template),
        join_label
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_join_label),
        parse_limit("max_negatives", max_negatives, defaults.max_negatives)?,
        parse_limit("max_sentences", max_sentences, defaults.max_sentences)?,
    )
}
