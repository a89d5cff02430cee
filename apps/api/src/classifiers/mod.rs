//! Rule-based text classifiers driving follow-up and section-transition
//! decisions.
//!
//! Each classifier is a pure predicate over the raw user message, evaluated
//! against an ordered list of compiled regex rules with early exit. Rules
//! are grouped by intent; grouping has no runtime effect.

mod escape;
mod frustration;
mod no_email;
mod vague;

pub use escape::detect_escape_phrase;
pub use frustration::detect_frustration;
pub use no_email::detect_no_email;
pub use vague::{detect_vague_answer, VagueVerdict};
