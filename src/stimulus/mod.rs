//! Stimuli applied to a candidate iterator
//!
//! Provides the vocabulary the explorer speaks:
//! - Three operations: `has_more`, `produce_next`, `remove_last`
//! - A feature set deciding which optional operations exist at all
//! - Bounded operation sequences replayed against fresh candidates

mod sequence;

pub use sequence::Sequence;

use std::fmt;

/// Single operation applied to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum Operation {
    /// Produce the next element
    ProduceNext,

    /// Ask whether another element is available
    HasMore,

    /// Remove the most recently produced element
    RemoveLast,
}

impl Operation {
    /// Every operation, in exploration order
    ///
    /// Matches the derived `Ord`, so depth-first order is lexicographic.
    pub const ALL: [Operation; 3] = [
        Operation::ProduceNext,
        Operation::HasMore,
        Operation::RemoveLast,
    ];

    /// Stable name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::HasMore => "has_more",
            Operation::ProduceNext => "produce_next",
            Operation::RemoveLast => "remove_last",
        }
    }

    /// Encode as a byte for fingerprints
    pub fn to_u8(&self) -> u8 {
        match self {
            Operation::ProduceNext => 0,
            Operation::HasMore => 1,
            Operation::RemoveLast => 2,
        }
    }

    /// Feature that must be present for this operation to be explored
    pub fn required_feature(&self) -> Option<Feature> {
        match self {
            Operation::RemoveLast => Some(Feature::Modifiable),
            Operation::HasMore | Operation::ProduceNext => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional capability of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub enum Feature {
    /// Candidate supports `remove_last`
    Modifiable,
}

impl Feature {
    fn bit(self) -> u8 {
        match self {
            Feature::Modifiable => 1 << 0,
        }
    }
}

/// Set of capabilities a candidate is expected to support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub struct FeatureSet {
    bits: u8,
}

impl FeatureSet {
    /// No optional operations
    pub const UNMODIFIABLE: FeatureSet = FeatureSet { bits: 0 };

    /// Removal supported
    pub const MODIFIABLE: FeatureSet = FeatureSet { bits: 1 };

    /// Empty set
    pub fn empty() -> Self {
        Self::UNMODIFIABLE
    }

    /// Add a feature
    pub fn with(mut self, feature: Feature) -> Self {
        self.bits |= feature.bit();
        self
    }

    /// Drop a feature
    pub fn without(mut self, feature: Feature) -> Self {
        self.bits &= !feature.bit();
        self
    }

    /// Membership test
    pub fn contains(&self, feature: Feature) -> bool {
        self.bits & feature.bit() != 0
    }

    /// Whether `op` exists at all under this feature set
    pub fn permits(&self, op: Operation) -> bool {
        op.required_feature()
            .map_or(true, |feature| self.contains(feature))
    }

    /// Operations that exist under this feature set, in exploration order
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL.into_iter().filter(move |op| self.permits(*op))
    }
}
