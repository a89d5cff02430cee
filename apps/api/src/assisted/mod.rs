//! Assisted (free-form) collection mode: model responses merged into the
//! record under confidence and contradiction rules.

pub mod context;
pub mod fallback;
pub mod orchestrator;
