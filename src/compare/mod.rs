//! Outcome comparison and error-kind classification
//!
//! Judges one observed outcome against the reference prediction:
//! - values must be equal (determinate) or pending members (indeterminate)
//! - errors must be of a compatible kind, not an identical one
//! - a value where an error was expected is a missing error, and vice versa
//!
//! One historical defect can be tolerated on request: after `produce_next`
//! correctly reports exhaustion, the next `remove_last` wrongly reports an
//! illegal removal state instead of removing the last produced element.

use crate::model::{ErrorKind, Expectation, Outcome};
use thiserror::Error;

/// Reason a step diverged from the reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum Violation {
    /// Returned value disagrees with the reference
    #[error("value mismatch: candidate result disagrees with the reference")]
    ValueMismatch,

    /// Reference expected an error, candidate returned normally
    #[error("missing exception: expected {expected} error but the candidate returned normally")]
    MissingError {
        /// Kind the reference predicted
        expected: ErrorKind,
    },

    /// Candidate raised an error of an incompatible kind
    #[error("mismatched exception: expected {expected} error but the candidate raised {actual}")]
    MismatchedKind {
        /// Kind the reference predicted
        expected: ErrorKind,
        /// Kind the candidate raised
        actual: ErrorKind,
    },

    /// Candidate raised an error where the reference predicted success
    #[error("unexpected exception: candidate raised {actual} where the reference predicted success")]
    UnexpectedError {
        /// Kind the candidate raised
        actual: ErrorKind,
    },

    /// Caller-supplied invariant check rejected the step
    #[error("invariant check failed: {message}")]
    InvariantFailed {
        /// Message from the hook
        message: String,
    },
}

/// Result of comparing one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Outcome agrees with the reference
    Match,

    /// Known legacy defect pattern, accepted by configuration
    Tolerated,

    /// Outcome diverges
    Diverge(Violation),
}

impl Verdict {
    /// Whether the run may continue past this step
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Verdict::Diverge(_))
    }
}

/// Compares expected and actual outcomes
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    tolerate_legacy_removal_defect: bool,
}

impl Comparator {
    /// Strict comparator
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the exhausted-then-illegal-removal defect pattern
    pub fn with_legacy_removal_tolerance(mut self, enabled: bool) -> Self {
        self.tolerate_legacy_removal_defect = enabled;
        self
    }

    /// Judge `actual` against `expected`
    ///
    /// `previous` is the candidate's outcome for the preceding step of the
    /// same sequence, if any.
    pub fn compare<T: PartialEq>(
        &self,
        expected: &Expectation<T>,
        actual: &Outcome<T>,
        previous: Option<&Outcome<T>>,
    ) -> Verdict {
        match (expected, actual) {
            (Expectation::Error(kind), Outcome::Failed(err)) => {
                if err.is_compatible_with(*kind) {
                    Verdict::Match
                } else {
                    Verdict::Diverge(Violation::MismatchedKind {
                        expected: *kind,
                        actual: err.kind(),
                    })
                }
            }
            (Expectation::Error(kind), _) => {
                Verdict::Diverge(Violation::MissingError { expected: *kind })
            }
            (Expectation::Removed, Outcome::Failed(err))
                if self.is_legacy_removal_defect(err.kind(), previous) =>
            {
                Verdict::Tolerated
            }
            (_, Outcome::Failed(err)) => {
                Verdict::Diverge(Violation::UnexpectedError { actual: err.kind() })
            }
            (Expectation::HasMore(want), Outcome::HasMore(got)) if want == got => Verdict::Match,
            (Expectation::Element(want), Outcome::Produced(got)) if want == got => Verdict::Match,
            (Expectation::AnyOf(pending), Outcome::Produced(got)) if pending.contains(got) => {
                Verdict::Match
            }
            (Expectation::Removed, Outcome::Removed) => Verdict::Match,
            _ => Verdict::Diverge(Violation::ValueMismatch),
        }
    }

    fn is_legacy_removal_defect<T>(&self, raised: ErrorKind, previous: Option<&Outcome<T>>) -> bool {
        self.tolerate_legacy_removal_defect
            && raised == ErrorKind::IllegalRemoveState
            && previous
                .and_then(Outcome::error)
                .map_or(false, |err| err.is_compatible_with(ErrorKind::Exhausted))
    }
}
