//! Reference behavior model
//!
//! Pure oracle for the iterator contract:
//! - `has_more` is true iff an element is still pending
//! - `produce_next` yields the next element, or `Exhausted` when none remain
//! - `remove_last` succeeds once per produced element, else `IllegalRemoveState`
//!
//! Two order contracts are modelled. Determinate order fixes the exact
//! production sequence; indeterminate order fixes only the multiset, and
//! the element a candidate actually produces is pinned for the rest of
//! the run.

mod outcome;
mod state;

pub use outcome::{CandidateError, ErrorKind, Outcome};
pub use state::{ExpectedState, StateShape};

use std::fmt;

/// Whether production order is part of the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum OrderMode {
    /// Exact sequence is known
    Determinate,

    /// Only the multiset is known
    Indeterminate,
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::Determinate => f.write_str("determinate"),
            OrderMode::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

/// Outcome the reference predicts for one operation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum Expectation<T> {
    /// `has_more` answers this
    HasMore(bool),

    /// Exactly this element
    Element(T),

    /// Any member of this multiset
    AnyOf(Vec<T>),

    /// Removal succeeds
    Removed,

    /// An error compatible with this kind
    Error(ErrorKind),
}

impl<T: fmt::Debug> fmt::Display for Expectation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::HasMore(more) => write!(f, "has_more = {}", more),
            Expectation::Element(value) => write!(f, "produced {:?}", value),
            Expectation::AnyOf(values) => write!(f, "any of {:?}", values),
            Expectation::Removed => f.write_str("removed"),
            Expectation::Error(kind) => write!(f, "error {}", kind),
        }
    }
}

/// Expected contents handed to invariant hooks after each matched step
#[derive(Debug, Clone, Copy)]
pub struct ExpectedElements<'a, T> {
    produced: &'a [T],
    pending: &'a [T],
}

impl<'a, T> ExpectedElements<'a, T> {
    pub(crate) fn new(produced: &'a [T], pending: &'a [T]) -> Self {
        Self { produced, pending }
    }

    /// Produced and not removed, in production order
    pub fn produced(&self) -> &'a [T] {
        self.produced
    }

    /// Not yet produced
    pub fn pending(&self) -> &'a [T] {
        self.pending
    }

    /// Everything the underlying collection must still hold
    pub fn retained(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.produced.iter().chain(self.pending).cloned().collect()
    }
}
