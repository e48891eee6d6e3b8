//! Bounded exhaustive sequence enumeration
//!
//! Generates, depth-first and in a fixed order, every operation sequence of
//! exactly `step_bound` operations that the reference considers meaningful.
//! Shorter sequences are prefixes of emitted ones and are checked step by
//! step when those run.
//!
//! Pruned by default: `remove_last` while no produced element is eligible
//! (before the first successful `produce_next`, or right after a removal).

mod traversal;

pub use traversal::Sequences;

use crate::model::StateShape;
use crate::stimulus::{FeatureSet, Operation, Sequence};

/// Restartable description of a bounded sequence space
#[derive(Debug, Clone)]
pub struct SequenceEnumerator {
    /// Operations per sequence
    step_bound: usize,

    /// Which optional operations exist
    features: FeatureSet,

    /// Size of the expected contents
    element_count: usize,

    /// Also explore removals the reference rejects
    explore_illegal_removals: bool,

    /// Skip sequences with more removals than this
    removal_cap: Option<usize>,
}

impl SequenceEnumerator {
    /// Space of sequences of `step_bound` operations over `element_count` elements
    pub fn new(step_bound: usize, features: FeatureSet, element_count: usize) -> Self {
        Self {
            step_bound,
            features,
            element_count,
            explore_illegal_removals: false,
            removal_cap: None,
        }
    }

    /// Keep `remove_last` at states where the reference expects it to fail
    pub fn with_illegal_removals(mut self, enabled: bool) -> Self {
        self.explore_illegal_removals = enabled;
        self
    }

    /// Limit the number of removals per sequence
    pub fn with_removal_cap(mut self, cap: Option<usize>) -> Self {
        self.removal_cap = cap;
        self
    }

    /// Operations per emitted sequence
    pub fn step_bound(&self) -> usize {
        self.step_bound
    }

    /// Size of the expected contents
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Feature set driving the operation alphabet
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Whether `op` may extend a path that reached `shape` with `removals` removals
    pub fn permits(&self, shape: StateShape, op: Operation, removals: usize) -> bool {
        if !self.features.permits(op) {
            return false;
        }
        if op != Operation::RemoveLast {
            return true;
        }
        if self.removal_cap.map_or(false, |cap| removals >= cap) {
            return false;
        }
        shape.can_remove || self.explore_illegal_removals
    }

    /// Fresh lazy pass over the space
    pub fn iter(&self) -> Sequences<'_> {
        Sequences::new(self)
    }

    /// Number of sequences in the space
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Digest of the ordered sequence space
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for sequence in self.iter() {
            absorb(&mut hasher, &sequence);
        }
        hasher.finalize()
    }
}

impl<'a> IntoIterator for &'a SequenceEnumerator {
    type Item = Sequence;
    type IntoIter = Sequences<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Feed one sequence into a running fingerprint
///
/// Length-prefixed so that concatenations stay unambiguous.
pub(crate) fn absorb(hasher: &mut blake3::Hasher, sequence: &Sequence) {
    hasher.update(&(sequence.len() as u64).to_le_bytes());
    hasher.update(&sequence.encode());
}
