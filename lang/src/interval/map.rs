use super::{Breakpoint, IntervalSequence};
use crate::sequence::Sequence;
use crate::strategy::Strategy;
use im_rc::Vector;
use std::cmp::Ordering;
use tracing::debug;

/// Binary decision tree answering point lookups on a step function.
///
/// A key goes left when it precedes `right_min` and right otherwise, until a
/// leaf holding its value is reached.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalMap<E, T> {
    Leaf(T),
    Node {
        left: Box<IntervalMap<E, T>>,
        right_min: E,
        right: Box<IntervalMap<E, T>>,
    },
}

type Breakpoints<E, T> = Sequence<Breakpoint<E, T>>;

impl<E: Clone + 'static, T: Clone + 'static> IntervalMap<E, T> {
    /// Streaming builder. The tree grows to the right: after `level`
    /// attachments the next right subtree may hold up to `2^level` leaves.
    /// Never materializes the breakpoint stream.
    pub fn sequential(sequence: &IntervalSequence<E, T>) -> Self {
        let mut tree = IntervalMap::Leaf(sequence.first.clone());
        let mut rest = sequence.rest.clone();
        let mut level = 0;

        while let Some((breakpoint, tail)) = rest.split_first() {
            let (right, remaining) = Self::build_limited(breakpoint.value, tail, level);
            tree = IntervalMap::node(tree, breakpoint.edge, right);
            rest = remaining;
            level += 1;
        }

        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built sequential interval map"
        );
        tree
    }

    // Builds at most 2^limit leaves and returns the unconsumed breakpoints.
    fn build_limited(first: T, rest: Breakpoints<E, T>, limit: u32) -> (Self, Breakpoints<E, T>) {
        if limit == 0 {
            return (IntervalMap::Leaf(first), rest);
        }
        let (left, rest) = Self::build_limited(first, rest, limit - 1);
        match rest.split_first() {
            Some((breakpoint, tail)) => {
                let (right, rest) = Self::build_limited(breakpoint.value, tail, limit - 1);
                (IntervalMap::node(left, breakpoint.edge, right), rest)
            }
            None => (left, rest),
        }
    }

    /// Exact halving of the leaf count: minimal total comparisons.
    pub fn balanced(sequence: &IntervalSequence<E, T>) -> Self {
        let breakpoints = sequence.rest.to_vector();
        let tree = Self::build_balanced(&sequence.first, &breakpoints, 0, breakpoints.len() + 1);

        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built balanced interval map"
        );
        tree
    }

    // Leaf 0 holds `first`, leaf i holds the value of breakpoint i - 1.
    fn build_balanced(
        first: &T,
        breakpoints: &Vector<Breakpoint<E, T>>,
        low: usize,
        high: usize,
    ) -> Self {
        if high - low <= 1 {
            let value = match low {
                0 => first.clone(),
                leaf => breakpoints[leaf - 1].value.clone(),
            };
            return IntervalMap::Leaf(value);
        }
        let middle = low + (high - low) / 2;
        IntervalMap::node(
            Self::build_balanced(first, breakpoints, low, middle),
            breakpoints[middle - 1].edge.clone(),
            Self::build_balanced(first, breakpoints, middle, high),
        )
    }
}

impl<E, T> IntervalMap<E, T> {
    fn node(left: Self, right_min: E, right: Self) -> Self {
        IntervalMap::Node {
            left: Box::new(left),
            right_min,
            right: Box::new(right),
        }
    }

    pub fn get(&self, strategy: &Strategy<E, T>, key: &E) -> &T {
        let mut tree = self;
        loop {
            match tree {
                IntervalMap::Leaf(value) => return value,
                IntervalMap::Node {
                    left,
                    right_min,
                    right,
                } => {
                    tree = if strategy.compare(key, right_min) == Ordering::Less {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            IntervalMap::Leaf(_) => 1,
            IntervalMap::Node { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Longest root-to-leaf path, in comparisons.
    pub fn depth(&self) -> usize {
        match self {
            IntervalMap::Leaf(_) => 0,
            IntervalMap::Node { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Sum of the depths of every leaf: the number of comparisons needed to
    /// look up one key per interval.
    pub fn total_comparisons(&self) -> usize {
        self.comparisons_below(0)
    }

    fn comparisons_below(&self, depth: usize) -> usize {
        match self {
            IntervalMap::Leaf(_) => depth,
            IntervalMap::Node { left, right, .. } => {
                left.comparisons_below(depth + 1) + right.comparisons_below(depth + 1)
            }
        }
    }
}
