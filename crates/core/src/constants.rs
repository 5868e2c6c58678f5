//! Constants used throughout the narrative core crate.

/// Sentence template used when a field does not define its own.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "{name}: {value}{unit}.";

/// Separator between selected checklist labels when a field does not define one.
pub const DEFAULT_JOIN_LABEL: &str = ", ";

/// Number of distinct negatives kept when compressing "No ..." statements.
pub const DEFAULT_MAX_NEGATIVES: usize = 3;

/// Number of sentences kept per organ paragraph.
pub const DEFAULT_MAX_SENTENCES: usize = 2;

/// Stride between sections when numbering composer atoms (`section * stride + line`).
pub const PRIORITY_SECTION_STRIDE: u32 = 100;

/// Case-insensitive answer text treated as "nothing to say".
pub const NOT_APPLICABLE: &str = "na";
