//! Read-only text checks run on the buffer being edited.
//!
//! # Responsibility
//! - Detect repeated 3-character phrasing.
//! - Measure the logographic / syllabary mix of a text.
//! - Flag doubled punctuation with line numbers.
//!
//! # Invariants
//! - Every check is a pure function of its input and fixed constants.
//! - Character positions are Unicode scalar values, not bytes.

pub mod punctuation;
pub mod repetition;
pub mod script_balance;

pub use punctuation::{
    punctuation_issues, PunctuationIssue, PunctuationIssueKind, PunctuationReport,
};
pub use repetition::{find_repetitions, Repetition};
pub use script_balance::{script_balance, ScriptBalance, ScriptShare, Verdict};

use thiserror::Error;

/// Failure signal for analyzer inputs that have no meaningful result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Text is empty after trimming, so shares are undefined.
    #[error("text is empty")]
    EmptyInput,
}
