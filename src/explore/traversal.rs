//! Depth-first sequence traversal
//!
//! Explicit stack of frames, one per depth. Each frame keeps the reference
//! shape reached at that depth and the index of the next operation to try,
//! so traversal is lazy and resumes exactly where it stopped.

use super::SequenceEnumerator;
use crate::model::StateShape;
use crate::stimulus::{Operation, Sequence};

/// One level of the exploration stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Reference shape after the path so far
    shape: StateShape,

    /// Next index into `Operation::ALL` to try
    next_choice: usize,
}

/// Lazy depth-first iterator over the sequence space
#[derive(Debug)]
pub struct Sequences<'a> {
    space: &'a SequenceEnumerator,
    stack: Vec<Frame>,
    path: Vec<Operation>,
    done: bool,
}

impl<'a> Sequences<'a> {
    pub(super) fn new(space: &'a SequenceEnumerator) -> Self {
        Self {
            space,
            stack: vec![Frame {
                shape: StateShape::initial(space.element_count()),
                next_choice: 0,
            }],
            path: Vec::with_capacity(space.step_bound()),
            done: false,
        }
    }

    fn removals_on_path(&self) -> usize {
        self.path
            .iter()
            .filter(|op| **op == Operation::RemoveLast)
            .count()
    }
}

impl Iterator for Sequences<'_> {
    type Item = Sequence;

    fn next(&mut self) -> Option<Sequence> {
        if self.done {
            return None;
        }
        if self.space.step_bound() == 0 {
            self.done = true;
            return Some(Sequence::empty());
        }

        loop {
            let removals = self.removals_on_path();
            let Some(frame) = self.stack.last_mut() else {
                break;
            };

            let mut chosen = None;
            while frame.next_choice < Operation::ALL.len() {
                let op = Operation::ALL[frame.next_choice];
                frame.next_choice += 1;
                if self.space.permits(frame.shape, op, removals) {
                    chosen = Some((op, frame.shape.after(op)));
                    break;
                }
            }

            match chosen {
                None => {
                    // Frame exhausted: backtrack one level
                    self.stack.pop();
                    self.path.pop();
                }
                Some((op, shape)) => {
                    self.path.push(op);
                    if self.path.len() == self.space.step_bound() {
                        let sequence = Sequence::from(self.path.clone());
                        self.path.pop();
                        return Some(sequence);
                    }
                    self.stack.push(Frame {
                        shape,
                        next_choice: 0,
                    });
                }
            }
        }

        self.done = true;
        None
    }
}
