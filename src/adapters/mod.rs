//! Built-in candidates
//!
//! Reference-quality implementations of the [`Candidate`] contract, useful
//! both as baselines and as building blocks for deliberately defective
//! wrappers.

use std::fmt;
use std::iter::Peekable;

use crate::model::CandidateError;
use crate::runner::Candidate;

/// Removable cursor over an owned vector
#[derive(Debug, Clone)]
pub struct VecCursor<T> {
    items: Vec<T>,

    /// Index of the next element to produce
    cursor: usize,

    /// Index of the last produced element, while still removable
    last: Option<usize>,
}

impl<T> VecCursor<T> {
    /// Cursor positioned before the first element
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: 0,
            last: None,
        }
    }

    /// Current contents of the backing vector
    pub fn contents(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> Candidate for VecCursor<T> {
    type Item = T;

    fn has_more(&mut self) -> Result<bool, CandidateError> {
        Ok(self.cursor < self.items.len())
    }

    fn produce_next(&mut self) -> Result<T, CandidateError> {
        let item = self
            .items
            .get(self.cursor)
            .cloned()
            .ok_or_else(CandidateError::exhausted)?;
        self.last = Some(self.cursor);
        self.cursor += 1;
        Ok(item)
    }

    fn remove_last(&mut self) -> Result<(), CandidateError> {
        let idx = self.last.take().ok_or_else(CandidateError::illegal_remove_state)?;
        self.items.remove(idx);
        self.cursor = idx;
        Ok(())
    }
}

/// Read-only adapter over any standard iterator
pub struct StdIter<I: Iterator> {
    inner: Peekable<I>,
}

impl<I: Iterator> fmt::Debug for StdIter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdIter").finish_non_exhaustive()
    }
}

impl<I: Iterator> StdIter<I> {
    /// Wrap an iterator
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: iter.into_iter().peekable(),
        }
    }
}

impl<I: Iterator> Candidate for StdIter<I> {
    type Item = I::Item;

    fn has_more(&mut self) -> Result<bool, CandidateError> {
        Ok(self.inner.peek().is_some())
    }

    fn produce_next(&mut self) -> Result<I::Item, CandidateError> {
        self.inner.next().ok_or_else(CandidateError::exhausted)
    }
}

/// Wrapper reproducing a historical platform defect
///
/// Once `produce_next` has reported exhaustion, every later `remove_last`
/// reports an illegal removal state instead of removing the last produced
/// element. Used to exercise the comparator's legacy defect tolerance.
#[derive(Debug, Clone)]
pub struct LegacyRemovalDefect<C> {
    inner: C,
    next_failed: bool,
}

impl<C> LegacyRemovalDefect<C> {
    /// Wrap a faithful candidate
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            next_failed: false,
        }
    }
}

impl<C: Candidate> Candidate for LegacyRemovalDefect<C> {
    type Item = C::Item;

    fn has_more(&mut self) -> Result<bool, CandidateError> {
        self.inner.has_more()
    }

    fn produce_next(&mut self) -> Result<C::Item, CandidateError> {
        self.inner.produce_next().map_err(|err| {
            self.next_failed = true;
            err
        })
    }

    fn remove_last(&mut self) -> Result<(), CandidateError> {
        if self.next_failed {
            return Err(CandidateError::illegal_remove_state());
        }
        self.inner.remove_last()
    }
}
