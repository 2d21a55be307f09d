//! Closed key intervals and the overlap comparison used by the index.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{EngineError, Result};

/// A closed interval `[left, right]` over a totally ordered key type.
///
/// The index stores one interval per block slot and keeps it equal to the
/// covering range of the slot's payload. Interval comparison treats overlap
/// as equality: for the mutually disjoint ranges the tree maintains this is
/// enough to decide which side of a block a key belongs to. The relation is
/// *not* a total order over arbitrary intervals, which is why `Interval`
/// implements [`Interval::compare`] rather than `Ord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<K> {
    /// Left (inclusive) endpoint.
    pub left: K,
    /// Right (inclusive) endpoint.
    pub right: K,
}

impl<K: Ord> Interval<K> {
    /// Builds the interval `[left, right]`.
    ///
    /// Returns [`EngineError::InvalidInterval`] when `left >= right`;
    /// degenerate and inverted intervals are rejected.
    pub fn new(left: K, right: K) -> Result<Self> {
        if left >= right {
            return Err(EngineError::InvalidInterval);
        }
        Ok(Self { left, right })
    }

    /// Builds the covering range `[min, max]` of a non-empty table or block.
    ///
    /// Unlike [`Interval::new`] this accepts `min == max`: a table holding a
    /// single record covers exactly one point.
    pub(crate) fn spanning(min: K, max: K) -> Self {
        debug_assert!(min <= max);
        Self {
            left: min,
            right: max,
        }
    }

    /// Whether `key` falls inside the closed interval.
    pub fn contains(&self, key: &K) -> bool {
        self.left <= *key && *key <= self.right
    }

    /// Compares two disjoint intervals by position; overlap compares equal.
    ///
    /// `Less` when `self` lies wholly to the left of `other`, `Greater` when
    /// wholly to the right, `Equal` otherwise.
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.right < other.left {
            Ordering::Less
        } else if self.left > other.right {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<K: fmt::Display> fmt::Display for Interval<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}
