//! Updatable min-priority queue with lazy deletion.
//!
//! Updating a vertex pushes a fresh entry and records its sequence number as the live one;
//! older entries for the same vertex stay in the heap and are skipped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct Entry {
    pi: f64,
    seq: u64,
    vertex: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so `BinaryHeap` (a max-heap) yields the smallest `(pi, seq)` first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .pi
            .total_cmp(&self.pi)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FrontierQueue {
    heap: BinaryHeap<Entry>,
    live: Vec<Option<u64>>,
    live_count: usize,
    next_seq: u64,
}

impl FrontierQueue {
    pub(crate) fn with_vertices(node_count: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(node_count),
            live: vec![None; node_count],
            live_count: 0,
            next_seq: 0,
        }
    }

    /// Inserts `vertex`, or supersedes its current entry, with priority `pi`.
    pub(crate) fn push(&mut self, vertex: usize, pi: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.live[vertex].replace(seq).is_none() {
            self.live_count += 1;
        }
        self.heap.push(Entry { pi, seq, vertex });
    }

    /// Pops the live vertex with the smallest priority; equal priorities pop in insertion order.
    pub(crate) fn pop(&mut self) -> Option<(usize, f64)> {
        while let Some(entry) = self.heap.pop() {
            if self.live[entry.vertex] == Some(entry.seq) {
                self.live[entry.vertex] = None;
                self.live_count -= 1;
                return Some((entry.vertex, entry.pi));
            }
        }
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.live_count
    }
}
