use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::model::{CandidateError, Outcome};
use crate::stimulus::Operation;

/// Trait implemented by the iterator-like implementation under test.
///
/// Errors are reported through `Err`; a panic inside any method is caught
/// by the runner and classified as [`ErrorKind::Panicked`](crate::ErrorKind::Panicked).
pub trait Candidate {
    /// Element type produced by the candidate.
    type Item;

    /// Whether another element is available.
    fn has_more(&mut self) -> Result<bool, CandidateError>;

    /// Produce the next element, or an `Exhausted` error when none remain.
    fn produce_next(&mut self) -> Result<Self::Item, CandidateError>;

    /// Remove the most recently produced element.
    ///
    /// Candidates without removal support keep the default.
    fn remove_last(&mut self) -> Result<(), CandidateError> {
        Err(CandidateError::unsupported())
    }
}

impl<C: Candidate + ?Sized> Candidate for Box<C> {
    type Item = C::Item;

    fn has_more(&mut self) -> Result<bool, CandidateError> {
        (**self).has_more()
    }

    fn produce_next(&mut self) -> Result<Self::Item, CandidateError> {
        (**self).produce_next()
    }

    fn remove_last(&mut self) -> Result<(), CandidateError> {
        (**self).remove_last()
    }
}

/// Apply `op` to `candidate`, capturing errors and panics as outcomes.
pub(crate) fn execute<C: Candidate>(candidate: &mut C, op: Operation) -> Outcome<C::Item> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match op {
        Operation::HasMore => candidate.has_more().map(Outcome::HasMore),
        Operation::ProduceNext => candidate.produce_next().map(Outcome::Produced),
        Operation::RemoveLast => candidate.remove_last().map(|()| Outcome::Removed),
    }));

    match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => Outcome::Failed(err),
        Err(payload) => Outcome::Failed(CandidateError::panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "candidate panicked".to_string()
    }
}
