//! Per-sequence run records

use std::fmt;

use crate::compare::{Verdict, Violation};
use crate::model::{Expectation, Outcome};
use crate::stimulus::{Operation, Sequence};

/// One executed step
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord<T> {
    /// Position in the sequence (0-indexed)
    pub index: usize,

    /// Operation applied
    pub operation: Operation,

    /// Reference prediction
    pub expected: Expectation<T>,

    /// Candidate outcome
    pub actual: Outcome<T>,

    /// Comparator judgement (or invariant failure)
    pub verdict: Verdict,
}

/// Everything observed while replaying one sequence
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord<T> {
    /// Sequence that was replayed
    pub sequence: Sequence,

    /// Steps executed, up to and including the first divergence
    pub steps: Vec<StepRecord<T>>,
}

impl<T> RunRecord<T> {
    /// Whether every step was acceptable
    pub fn is_success(&self) -> bool {
        self.failed_step().is_none()
    }

    /// Step that diverged, if any
    pub fn failed_step(&self) -> Option<&StepRecord<T>> {
        self.steps.last().filter(|step| !step.verdict.is_acceptable())
    }

    /// Reason of the divergence, if any
    pub fn violation(&self) -> Option<&Violation> {
        match self.failed_step().map(|step| &step.verdict) {
            Some(Verdict::Diverge(violation)) => Some(violation),
            _ => None,
        }
    }

    /// Operations executed, including the diverging one
    pub fn executed_prefix(&self) -> Sequence {
        self.sequence.prefix(self.steps.len())
    }

    /// Steps accepted under the legacy defect tolerance
    pub fn tolerated_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.verdict == Verdict::Tolerated)
            .count()
    }
}

impl<T: fmt::Debug> fmt::Display for RunRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(step) = self.failed_step() else {
            return write!(f, "sequence {} passed", self.sequence);
        };
        writeln!(
            f,
            "sequence {} diverged at step {} ({}) with stimuli {}",
            self.sequence,
            step.index + 1,
            step.operation,
            self.executed_prefix()
        )?;
        writeln!(f, "  expected: {}", step.expected)?;
        writeln!(f, "  actual:   {}", step.actual)?;
        match &step.verdict {
            Verdict::Diverge(violation) => write!(f, "  reason:   {}", violation),
            _ => Ok(()),
        }
    }
}
