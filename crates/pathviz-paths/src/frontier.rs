//! Frontier strategies: the one place BFS, DFS and A* differ.
//!
//! A [`SearchRun`](crate::SearchRun) asks its frontier which cell to expand
//! next and how newly found neighbors are admitted ([`Discovery`]).
//! Everything else (marking, predecessors, termination) is shared.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};

use pathviz_core::Point;

/// How a search admits a neighbor into the frontier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Discovery {
    /// Each cell is admitted at most once, when first seen.
    Once,
    /// A cell is (re-)admitted whenever a strictly cheaper route to it is
    /// found, until it has been expanded.
    Relax,
}

/// Container of discovered-but-unexpanded cells.
pub trait Frontier {
    /// Admit `p`. Strategies without an ordering ignore `priority`.
    fn push(&mut self, p: Point, priority: f64);

    /// Remove and return the next cell to expand.
    fn pop(&mut self) -> Option<Point>;

    /// Number of cells waiting.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn discovery(&self) -> Discovery;
}

// ---------------------------------------------------------------------------
// FIFO / LIFO
// ---------------------------------------------------------------------------

/// First in, first out. Breadth-first order.
#[derive(Debug, Default)]
pub struct Fifo(VecDeque<Point>);

impl Frontier for Fifo {
    fn push(&mut self, p: Point, _priority: f64) {
        self.0.push_back(p);
    }

    fn pop(&mut self) -> Option<Point> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn discovery(&self) -> Discovery {
        Discovery::Once
    }
}

/// Last in, first out. Depth-first order.
#[derive(Debug, Default)]
pub struct Lifo(Vec<Point>);

impl Frontier for Lifo {
    fn push(&mut self, p: Point, _priority: f64) {
        self.0.push(p);
    }

    fn pop(&mut self) -> Option<Point> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn discovery(&self) -> Discovery {
        Discovery::Once
    }
}

// ---------------------------------------------------------------------------
// OpenSet
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry {
    priority: f64,
    /// Insertion counter; lower pops first among equal priorities.
    seq: u64,
    pos: Point,
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
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Minimum-priority open set with a set-like view: a cell is in the set at
/// most once, and re-pushing it replaces its priority.
///
/// Backed by a binary heap with lazy deletion. Among equal priorities the
/// cell pushed first pops first, so the order is fully deterministic.
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<Reverse<Entry>>,
    /// Cell → sequence number of its live heap entry.
    live: HashMap<Point, u64>,
    seq: u64,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `p` is waiting in the set.
    pub fn contains(&self, p: Point) -> bool {
        self.live.contains_key(&p)
    }
}

impl Frontier for OpenSet {
    fn push(&mut self, pos: Point, priority: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.live.insert(pos, seq);
        self.heap.push(Reverse(Entry { priority, seq, pos }));
    }

    fn pop(&mut self) -> Option<Point> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            // Skip entries superseded by a later push of the same cell.
            if self.live.get(&entry.pos) == Some(&entry.seq) {
                self.live.remove(&entry.pos);
                return Some(entry.pos);
            }
        }
        None
    }

    fn len(&self) -> usize {
        self.live.len()
    }

    fn discovery(&self) -> Discovery {
        Discovery::Relax
    }
}
