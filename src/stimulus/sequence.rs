//! Ordered operation sequences

use super::Operation;
use std::fmt;

/// Ordered list of operations applied to one candidate instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize))]
pub struct Sequence {
    ops: Vec<Operation>,
}

impl Sequence {
    /// Empty sequence
    pub fn empty() -> Self {
        Self { ops: Vec::new() }
    }

    /// Operations in order
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the sequence holds no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// First `len` operations
    pub fn prefix(&self, len: usize) -> Sequence {
        Sequence {
            ops: self.ops[..len.min(self.ops.len())].to_vec(),
        }
    }

    /// Number of `remove_last` operations
    pub fn removals(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == Operation::RemoveLast)
            .count()
    }

    /// Byte encoding used for fingerprints
    pub fn encode(&self) -> Vec<u8> {
        self.ops.iter().map(Operation::to_u8).collect()
    }
}

impl From<Vec<Operation>> for Sequence {
    fn from(ops: Vec<Operation>) -> Self {
        Self { ops }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", op)?;
        }
        f.write_str("]")
    }
}
