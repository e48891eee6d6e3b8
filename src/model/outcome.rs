//! Observed outcomes and the error kinds a candidate may raise

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Base classification of a candidate error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// No more elements to produce
    Exhausted,

    /// Removal attempted with nothing eligible
    IllegalRemoveState,

    /// Operation not supported by the candidate
    Unsupported,

    /// Candidate rejected its input
    InvalidArgument,

    /// Candidate panicked
    Panicked,
}

impl ErrorKind {
    /// Stable name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Exhausted => "exhausted",
            ErrorKind::IllegalRemoveState => "illegal-remove-state",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::Panicked => "panicked",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a candidate
///
/// A specialized error is a subordinate kind of its base kind: it is
/// accepted wherever the base kind is expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
#[error("{kind}{}: {message}", specialization_suffix(.specialization))]
pub struct CandidateError {
    kind: ErrorKind,
    specialization: Option<Cow<'static, str>>,
    message: String,
}

impl CandidateError {
    /// Create error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            specialization: None,
            message: message.into(),
        }
    }

    /// No more elements
    pub fn exhausted() -> Self {
        Self::new(ErrorKind::Exhausted, "no more elements")
    }

    /// Nothing eligible for removal
    pub fn illegal_remove_state() -> Self {
        Self::new(ErrorKind::IllegalRemoveState, "no element eligible for removal")
    }

    /// Operation not supported
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported, "operation not supported")
    }

    /// Candidate panicked with the given payload
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Panicked, message)
    }

    /// Mark this error as a named subordinate of its base kind
    pub fn specialize(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.specialization = Some(name.into());
        self
    }

    /// Base kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Subordinate kind name, if any
    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    /// Message supplied by the candidate
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error may stand in for an expected `kind`
    ///
    /// Same base kind is compatible regardless of specialization.
    pub fn is_compatible_with(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

fn specialization_suffix(specialization: &Option<Cow<'static, str>>) -> String {
    specialization
        .as_deref()
        .map(|name| format!(" ({})", name))
        .unwrap_or_default()
}

/// Outcome observed from one candidate operation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum Outcome<T> {
    /// `has_more` answered
    HasMore(bool),

    /// `produce_next` returned an element
    Produced(T),

    /// `remove_last` completed
    Removed,

    /// Operation raised an error
    Failed(CandidateError),
}

impl<T> Outcome<T> {
    /// Error carried by this outcome, if any
    pub fn error(&self) -> Option<&CandidateError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HasMore(more) => write!(f, "has_more = {}", more),
            Outcome::Produced(value) => write!(f, "produced {:?}", value),
            Outcome::Removed => f.write_str("removed"),
            Outcome::Failed(err) => write!(f, "error {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialized_error_is_compatible() {
        let err = CandidateError::exhausted().specialize("drained-source");
        assert!(err.is_compatible_with(ErrorKind::Exhausted));
        assert!(!err.is_compatible_with(ErrorKind::IllegalRemoveState));
        assert_eq!(err.specialization(), Some("drained-source"));
        assert_eq!(err.to_string(), "exhausted (drained-source): no more elements");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Produced(4).to_string(), "produced 4");
        assert_eq!(
            Outcome::<i32>::Failed(CandidateError::unsupported()).to_string(),
            "error unsupported: operation not supported"
        );
    }
}
