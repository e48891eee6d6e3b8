//! Sequence replay against fresh candidates
//!
//! Each sequence gets its own candidate and its own reference snapshot.
//! Nothing is undone in place: a candidate is discarded after one sequence.

mod candidate;
mod record;

pub use candidate::Candidate;
pub use record::{RunRecord, StepRecord};

use thiserror::Error;
use tracing::{trace, warn};

use crate::compare::{Comparator, Verdict, Violation};
use crate::model::{ExpectedElements, ExpectedState, OrderMode, Outcome};
use crate::stimulus::Sequence;

/// Failure raised by a caller-supplied invariant hook
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvariantFailure {
    message: String,
}

impl InvariantFailure {
    /// Failure with the given explanation
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Explanation supplied by the hook
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for InvariantFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for InvariantFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Replays single sequences in lock-step with the reference model
#[derive(Debug, Clone, Copy)]
pub struct SequenceRunner<'a, T> {
    expected: &'a [T],
    order: OrderMode,
    comparator: Comparator,
}

impl<'a, T: Clone + PartialEq> SequenceRunner<'a, T> {
    /// Runner checking against `expected` under `order`
    pub fn new(expected: &'a [T], order: OrderMode, comparator: Comparator) -> Self {
        Self {
            expected,
            order,
            comparator,
        }
    }

    /// Replay `sequence` on one fresh candidate from `factory`
    ///
    /// Stops at the first divergence; `hook` runs after every accepted step
    /// and a hook failure counts as a divergence at that step.
    pub fn run<C, F, H>(&self, sequence: &Sequence, factory: &mut F, hook: &mut H) -> RunRecord<T>
    where
        C: Candidate<Item = T>,
        F: FnMut() -> C,
        H: FnMut(ExpectedElements<'_, T>) -> Result<(), InvariantFailure>,
    {
        let mut candidate = factory();
        let mut state = ExpectedState::initial(self.expected, self.order);
        let mut record = RunRecord {
            sequence: sequence.clone(),
            steps: Vec::with_capacity(sequence.len()),
        };

        for (index, &operation) in sequence.operations().iter().enumerate() {
            let expected = state.predict(operation);
            let actual = candidate::execute(&mut candidate, operation);
            let previous = record.steps.last().map(|step| &step.actual);
            let mut verdict = self.comparator.compare(&expected, &actual, previous);

            match verdict {
                Verdict::Diverge(_) => {}
                Verdict::Tolerated => {
                    warn!(
                        step = index + 1,
                        sequence = %sequence,
                        "tolerating legacy removal defect after exhaustion"
                    );
                    state = state.forfeit_removal();
                }
                Verdict::Match => {
                    let produced = match &actual {
                        Outcome::Produced(value) => Some(value),
                        _ => None,
                    };
                    state = state.advance(operation, produced);
                }
            }

            if verdict.is_acceptable() {
                if let Err(failure) = hook(state.elements()) {
                    verdict = Verdict::Diverge(Violation::InvariantFailed {
                        message: failure.message().to_string(),
                    });
                }
            }

            let stop = !verdict.is_acceptable();
            record.steps.push(StepRecord {
                index,
                operation,
                expected,
                actual,
                verdict,
            });
            if stop {
                break;
            }
        }

        trace!(
            sequence = %sequence,
            steps = record.steps.len(),
            success = record.is_success(),
            "sequence replayed"
        );
        record
    }
}
