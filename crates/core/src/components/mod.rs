//! Input components of the narrative engine.
//!
//! These are the plain, serialisable data contracts the engine consumes, independent of the
//! on-disk wire formats handled by `narrative-wire`.

pub mod answer;
pub mod field;
pub mod section;
