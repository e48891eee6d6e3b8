//! # Bounded Exhaustive Iterator Conformance Testing
//!
//! This library checks a stateful sequential-access implementation (an
//! "iterator" exposing `has_more`, `produce_next` and optionally
//! `remove_last`) against a reference model of correct behavior.
//!
//! ## Core Algorithm
//!
//! 1. **Enumeration**: generate, depth-first, every meaningful operation
//!    sequence up to a fixed step bound
//! 2. **Replay**: run each sequence on a fresh candidate, in lock-step with
//!    an immutable reference snapshot
//! 3. **Comparison**: judge every step (values, error kinds, invariants)
//! 4. **Counterexample**: stop at the first divergence, in enumeration order
//!
//! A small model checker rather than a fuzzer: the space is explored in a
//! fixed order so a failing candidate always reproduces the same report.
//!
//! ## Usage Example
//!
//! ```
//! use iterconform::{IteratorTester, OrderMode, TesterConfig, VecCursor};
//!
//! let config = TesterConfig::new(OrderMode::Determinate).with_steps(4);
//! let tester = IteratorTester::new(vec![1, 2, 3], config);
//! let summary = tester.test(|| VecCursor::new(vec![1, 2, 3])).unwrap();
//! assert!(summary.sequences_run > 0);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - leaf first
pub mod stimulus; // Operations, feature sets, sequences
pub mod model;    // Reference behavior model
pub mod compare;  // Outcome comparison and error classification
pub mod explore;  // Depth-first sequence enumeration
pub mod runner;   // Sequence replay against candidates
pub mod adapters; // Built-in candidates

// Re-exports for convenience
pub use adapters::{LegacyRemovalDefect, StdIter, VecCursor};
pub use compare::{Comparator, Verdict, Violation};
pub use explore::SequenceEnumerator;
pub use model::{CandidateError, ErrorKind, ExpectedElements, Expectation, OrderMode, Outcome};
pub use runner::{Candidate, InvariantFailure, RunRecord, SequenceRunner, StepRecord};
pub use stimulus::{Feature, FeatureSet, Operation, Sequence};

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

/// Largest accepted step bound
///
/// The space grows as 3^steps when removal is enabled.
pub const MAX_STEPS: usize = 16;

/// Configuration parameters for a conformance run
#[derive(Debug, Clone)]
pub struct TesterConfig {
    /// Order contract being checked
    pub order: OrderMode,

    /// Operations per explored sequence
    pub steps: usize,

    /// Optional operations the candidate supports
    pub features: FeatureSet,

    /// Accept exhausted-then-illegal-removal (known legacy defect)
    pub tolerate_legacy_removal_defect: bool,

    /// Also explore removals the reference rejects
    pub explore_illegal_removals: bool,

    /// Skip sequences with more removals than this
    pub removal_cap: Option<usize>,
}

impl TesterConfig {
    /// Default configuration: 3 steps, modifiable, strict comparison
    pub fn new(order: OrderMode) -> Self {
        Self {
            order,
            steps: 3,
            features: FeatureSet::MODIFIABLE,
            tolerate_legacy_removal_defect: false,
            explore_illegal_removals: false,
            removal_cap: None,
        }
    }

    /// Set step bound
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set feature set
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Enable or disable the legacy removal defect tolerance
    pub fn with_legacy_removal_tolerance(mut self, enabled: bool) -> Self {
        self.tolerate_legacy_removal_defect = enabled;
        self
    }

    /// Explore removals at states where the reference expects them to fail
    pub fn with_illegal_removals(mut self, enabled: bool) -> Self {
        self.explore_illegal_removals = enabled;
        self
    }

    /// Limit removals per sequence
    pub fn with_removal_cap(mut self, cap: Option<usize>) -> Self {
        self.removal_cap = cap;
        self
    }

    /// Check the configuration before a run
    pub fn validate<T: fmt::Debug>(&self) -> Result<(), TesterError<T>> {
        if self.steps > MAX_STEPS {
            return Err(TesterError::StepBoundTooLarge {
                steps: self.steps,
                max: MAX_STEPS,
            });
        }
        if self.explore_illegal_removals && !self.features.contains(Feature::Modifiable) {
            return Err(TesterError::IllegalRemovalsNeedModifiable);
        }
        Ok(())
    }

    /// Sequence space for `element_count` expected elements
    pub fn enumerator(&self, element_count: usize) -> SequenceEnumerator {
        SequenceEnumerator::new(self.steps, self.features, element_count)
            .with_illegal_removals(self.explore_illegal_removals)
            .with_removal_cap(self.removal_cap)
    }

    /// Comparator honoring the tolerance flag
    pub fn comparator(&self) -> Comparator {
        Comparator::new().with_legacy_removal_tolerance(self.tolerate_legacy_removal_defect)
    }
}

/// Result of a run in which no sequence diverged
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    /// Sequences replayed
    pub sequences_run: usize,

    /// Operations executed across all sequences
    pub steps_executed: usize,

    /// Steps accepted under the legacy defect tolerance
    pub tolerated_steps: usize,

    /// Digest of the explored sequences, in order
    pub fingerprint: blake3::Hash,
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sequences passed ({} steps, {} tolerated), space {}",
            self.sequences_run,
            self.steps_executed,
            self.tolerated_steps,
            self.fingerprint.to_hex()
        )
    }
}

/// First counterexample found
#[derive(Debug, Clone)]
pub struct FailureReport<T> {
    /// Position of the failing sequence in enumeration order (0-indexed)
    pub sequence_index: usize,

    /// Order contract that was checked
    pub order: OrderMode,

    /// Full record of the failing run
    pub record: RunRecord<T>,
}

impl<T> FailureReport<T> {
    /// Reason of the divergence
    pub fn violation(&self) -> Option<&Violation> {
        self.record.violation()
    }
}

impl<T: fmt::Debug> fmt::Display for FailureReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "candidate diverged from the {} reference in sequence #{}",
            self.order,
            self.sequence_index + 1
        )?;
        write!(f, "{}", self.record)
    }
}

/// Errors that can occur during a conformance run
#[derive(Error, Debug)]
pub enum TesterError<T: fmt::Debug> {
    /// Step bound above [`MAX_STEPS`]
    #[error("invalid tester configuration: step bound {steps} exceeds maximum {max}")]
    StepBoundTooLarge {
        /// Requested step bound
        steps: usize,
        /// Largest accepted step bound
        max: usize,
    },

    /// Illegal removals requested for a read-only candidate
    #[error("invalid tester configuration: illegal removals can only be explored on modifiable candidates")]
    IllegalRemovalsNeedModifiable,

    /// Candidate diverged from the reference
    #[error("{0}")]
    Diverged(Box<FailureReport<T>>),
}

impl<T: fmt::Debug> TesterError<T> {
    /// Failure report, if the candidate diverged
    pub fn report(&self) -> Option<&FailureReport<T>> {
        match self {
            TesterError::Diverged(report) => Some(report),
            TesterError::StepBoundTooLarge { .. } | TesterError::IllegalRemovalsNeedModifiable => None,
        }
    }

    /// Divergence reason, if the candidate diverged
    pub fn violation(&self) -> Option<&Violation> {
        self.report().and_then(FailureReport::violation)
    }
}

/// Main conformance driver
///
/// Coordinates enumeration, replay and comparison over the whole space
#[derive(Debug, Clone)]
pub struct IteratorTester<T> {
    expected: Vec<T>,
    config: TesterConfig,
}

impl<T: Clone + PartialEq + fmt::Debug> IteratorTester<T> {
    /// Create tester for the expected contents
    pub fn new(expected: impl IntoIterator<Item = T>, config: TesterConfig) -> Self {
        Self {
            expected: expected.into_iter().collect(),
            config,
        }
    }

    /// Sequence space this tester explores
    pub fn sequences(&self) -> SequenceEnumerator {
        self.config.enumerator(self.expected.len())
    }

    /// Run every sequence against fresh candidates from `factory`
    pub fn test<C, F>(&self, factory: F) -> Result<TestSummary, TesterError<T>>
    where
        C: Candidate<Item = T>,
        F: FnMut() -> C,
    {
        self.test_with_invariant(factory, |_| Ok(()))
    }

    /// Like [`test`](Self::test), calling `hook` after every accepted step
    ///
    /// This is the main entry point that orchestrates:
    /// 1. Sequence enumeration in deterministic depth-first order
    /// 2. Lock-step replay on a fresh candidate per sequence
    /// 3. Short-circuit on the first divergence
    pub fn test_with_invariant<C, F, H>(
        &self,
        mut factory: F,
        mut hook: H,
    ) -> Result<TestSummary, TesterError<T>>
    where
        C: Candidate<Item = T>,
        F: FnMut() -> C,
        H: FnMut(ExpectedElements<'_, T>) -> Result<(), InvariantFailure>,
    {
        self.config.validate()?;

        let space = self.sequences();
        let runner = SequenceRunner::new(&self.expected, self.config.order, self.config.comparator());

        info!(
            order = %self.config.order,
            steps = self.config.steps,
            elements = self.expected.len(),
            tolerate_legacy_defect = self.config.tolerate_legacy_removal_defect,
            "exploring sequence space"
        );

        let mut hasher = blake3::Hasher::new();
        let mut sequences_run = 0;
        let mut steps_executed = 0;
        let mut tolerated_steps = 0;

        for (index, sequence) in space.iter().enumerate() {
            let record = runner.run(&sequence, &mut factory, &mut hook);
            explore::absorb(&mut hasher, &sequence);
            sequences_run += 1;
            steps_executed += record.steps.len();
            tolerated_steps += record.tolerated_steps();

            if !record.is_success() {
                debug!(
                    sequence_index = index,
                    sequence = %sequence,
                    steps = record.steps.len(),
                    "candidate diverged"
                );
                return Err(TesterError::Diverged(Box::new(FailureReport {
                    sequence_index: index,
                    order: self.config.order,
                    record,
                })));
            }
        }

        let summary = TestSummary {
            sequences_run,
            steps_executed,
            tolerated_steps,
            fingerprint: hasher.finalize(),
        };
        info!(
            sequences = summary.sequences_run,
            steps = summary.steps_executed,
            tolerated = summary.tolerated_steps,
            "no divergence found"
        );
        Ok(summary)
    }
}
