//! # Rank Queue
//!
//! Max-priority queue of stories ordered by score only.
//! Heap positions stay internal; callers only see stories.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::types::Story;

/// Heap entry. Equality and ordering look at the score alone, ties pop in arbitrary order.
struct Rank(Story);

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.0.score == other.0.score
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.score.cmp(&other.0.score)
    }
}

#[derive(Default)]
pub struct RankQueue {
    heap: BinaryHeap<Rank>,
}

impl RankQueue {
    #[allow(dead_code)]
    pub fn push(&mut self, story: Story) {
        self.heap.push(Rank(story));
    }

    /// Removes and returns the highest-scored story.
    pub fn pop(&mut self) -> Option<Story> {
        self.heap.pop().map(|rank| rank.0)
    }

    #[allow(dead_code)]
    pub fn peek(&self) -> Option<&Story> {
        self.heap.peek().map(|rank| &rank.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl FromIterator<Story> for RankQueue {
    fn from_iter<I: IntoIterator<Item = Story>>(iter: I) -> Self {
        // BinaryHeap::from_iter heapifies in O(n)
        Self {
            heap: iter.into_iter().map(Rank).collect(),
        }
    }
}
