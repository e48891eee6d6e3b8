//! Reference state snapshots
//!
//! Immutable: every transition returns a new snapshot, so exploration
//! never has to roll anything back.

use super::{ErrorKind, ExpectedElements, Expectation, OrderMode};
use crate::stimulus::Operation;

/// Reference model's view of the candidate at one point of a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedState<T> {
    /// Order contract being checked
    order: OrderMode,

    /// Produced and not removed, in production order
    produced: Vec<T>,

    /// Not yet produced (positional for determinate order)
    pending: Vec<T>,

    /// Last produced element is still eligible for removal
    can_remove: bool,
}

impl<T: Clone + PartialEq> ExpectedState<T> {
    /// Fresh snapshot before any operation
    pub fn initial(elements: &[T], order: OrderMode) -> Self {
        Self {
            order,
            produced: Vec::new(),
            pending: elements.to_vec(),
            can_remove: false,
        }
    }

    /// Expected outcome of applying `op` to this state
    pub fn predict(&self, op: Operation) -> Expectation<T> {
        match op {
            Operation::HasMore => Expectation::HasMore(!self.pending.is_empty()),
            Operation::ProduceNext => match (self.order, self.pending.first()) {
                (_, None) => Expectation::Error(ErrorKind::Exhausted),
                (OrderMode::Determinate, Some(next)) => Expectation::Element(next.clone()),
                (OrderMode::Indeterminate, Some(_)) => Expectation::AnyOf(self.pending.clone()),
            },
            Operation::RemoveLast if self.can_remove => Expectation::Removed,
            Operation::RemoveLast => Expectation::Error(ErrorKind::IllegalRemoveState),
        }
    }

    /// Whether `value` may be the next produced element
    pub fn admits(&self, value: &T) -> bool {
        match self.order {
            OrderMode::Determinate => self.pending.first() == Some(value),
            OrderMode::Indeterminate => self.pending.contains(value),
        }
    }

    /// Snapshot after `op` completed as predicted
    ///
    /// `observed` is the element the candidate actually produced; without
    /// it the next positional element is taken.
    pub fn advance(&self, op: Operation, observed: Option<&T>) -> Self {
        let mut next = self.clone();
        match op {
            Operation::HasMore => {}
            Operation::ProduceNext => {
                if next.pending.is_empty() {
                    return next;
                }
                let idx = match (self.order, observed) {
                    (OrderMode::Indeterminate, Some(value)) => next
                        .pending
                        .iter()
                        .position(|candidate| candidate == value)
                        .unwrap_or(0),
                    _ => 0,
                };
                let element = next.pending.remove(idx);
                next.produced.push(element);
                next.can_remove = true;
            }
            Operation::RemoveLast => {
                if next.can_remove {
                    next.produced.pop();
                    next.can_remove = false;
                }
            }
        }
        next
    }

    /// Snapshot after an attempted removal that removed nothing
    pub fn forfeit_removal(&self) -> Self {
        Self {
            can_remove: false,
            ..self.clone()
        }
    }

    /// Value-free projection used by the enumerator
    pub fn shape(&self) -> StateShape {
        StateShape {
            pending: self.pending.len(),
            produced: self.produced.len(),
            can_remove: self.can_remove,
        }
    }

    /// Elements view handed to invariant hooks
    pub fn elements(&self) -> ExpectedElements<'_, T> {
        ExpectedElements::new(&self.produced, &self.pending)
    }
}

/// Counts-only projection of an [`ExpectedState`]
///
/// Legality of an operation depends only on these counts, never on
/// element values, so the sequence space can be explored without them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateShape {
    /// Elements not yet produced
    pub pending: usize,

    /// Elements produced and not removed
    pub produced: usize,

    /// Last produced element still removable
    pub can_remove: bool,
}

impl StateShape {
    /// Shape before any operation on `len` elements
    pub fn initial(len: usize) -> Self {
        Self {
            pending: len,
            produced: 0,
            can_remove: false,
        }
    }

    /// Shape after the reference applies `op`
    pub fn after(self, op: Operation) -> Self {
        match op {
            Operation::HasMore => self,
            Operation::ProduceNext if self.pending > 0 => Self {
                pending: self.pending - 1,
                produced: self.produced + 1,
                can_remove: true,
            },
            Operation::ProduceNext => self,
            Operation::RemoveLast if self.can_remove => {
                debug_assert!(self.produced > 0, "removable element must exist");
                Self {
                    produced: self.produced.saturating_sub(1),
                    can_remove: false,
                    ..self
                }
            }
            Operation::RemoveLast => self,
        }
    }
}
