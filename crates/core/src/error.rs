/// Errors raised at the engine boundary (input translation and configuration).
///
/// The narrative entry points themselves never fail; see [`crate::generate`] and
/// [`crate::compose`].
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("wire error: {0}")]
    Wire(#[from] narrative_wire::WireError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

pub type NarrativeResult<T> = std::result::Result<T, NarrativeError>;

/// Failure to format a sentence template.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },
}
