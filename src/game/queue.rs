use std::collections::VecDeque;

use super::action::Direction;

/// Bounded FIFO of player turns that have not been applied by a tick yet
///
/// A tick consumes at most one entry. Once the queue is full, further turns
/// are dropped instead of overriding what was already banked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionQueue {
    pending: VecDeque<Direction>,
    capacity: usize,
}

impl DirectionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn; returns false (and drops it) when the queue is full
    pub fn push(&mut self, direction: Direction) -> bool {
        if self.is_full() {
            return false;
        }
        self.pending.push_back(direction);
        true
    }

    /// Take the oldest pending turn
    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    /// Most recently queued turn
    pub fn last(&self) -> Option<Direction> {
        self.pending.back().copied()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
