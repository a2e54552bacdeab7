//! Frontier containers used by the solvers: a min-priority queue for A* and a FIFO
//! queue for breadth-first search. Both track which cells they hold.
use fxhash::FxHashSet;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::cell::Position;

struct SequencedEntry {
    priority: usize,
    sequence: u64,
    position: Position,
}

impl Eq for SequencedEntry {}

impl PartialEq for SequencedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl PartialOrd for SequencedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SequencedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reversed so the lowest priority comes out first,
        // and among equal priorities the earliest inserted one.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-queue keyed on `(priority, insertion sequence)`.
///
/// A cell is held at most once. Its entry keeps the priority and sequence it was queued
/// with until it is popped, even if the caller later finds a cheaper way to reach it.
#[derive(Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<SequencedEntry>,
    members: FxHashSet<Position>,
    next_sequence: u64,
}

impl PriorityFrontier {
    pub fn new() -> PriorityFrontier {
        PriorityFrontier::default()
    }

    /// Queues a cell that is not yet a member. Returns false if it already is.
    pub fn push(&mut self, position: Position, priority: usize) -> bool {
        if !self.members.insert(position) {
            return false;
        }
        self.next_sequence += 1;
        self.heap.push(SequencedEntry {
            priority,
            sequence: self.next_sequence,
            position,
        });
        true
    }

    pub fn pop(&mut self) -> Option<Position> {
        let entry = self.heap.pop()?;
        self.members.remove(&entry.position);
        Some(entry.position)
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.members.contains(position)
    }
}

/// First-in first-out queue that remembers every cell it ever accepted, so each cell
/// is queued at most once.
#[derive(Default)]
pub struct FifoFrontier {
    queue: VecDeque<Position>,
    seen: FxHashSet<Position>,
}

impl FifoFrontier {
    pub fn new() -> FifoFrontier {
        FifoFrontier::default()
    }

    /// Queues a cell unless it was seen before. Returns whether it was queued.
    pub fn push(&mut self, position: Position) -> bool {
        if !self.seen.insert(position) {
            return false;
        }
        self.queue.push_back(position);
        true
    }

    pub fn pop(&mut self) -> Option<Position> {
        self.queue.pop_front()
    }
}
