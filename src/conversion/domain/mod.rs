//! Conversion results and audit text.

mod outcome;

pub use outcome::{ConversionOutcome, UNKNOWN_ACTOR, assignment_text};
