//! Named barrier: becomes available once every expected name has been seen.
//!
//! The executor keeps one barrier per graph node, keyed by predecessor index. A node
//! becomes Ready when its barrier is available, i.e. every predecessor is Done. This
//! is the fan-in join: a node with three predecessors waits for all three.
//!
//! # Example
//!
//! ```rust
//! use datahopper::channels::NamedBarrierValue;
//!
//! let mut barrier: NamedBarrierValue<usize> = NamedBarrierValue::from_names([0, 1, 2]);
//! assert!(!barrier.is_available());
//!
//! barrier.mark_seen(0);
//! barrier.mark_seen(1);
//! assert_eq!(barrier.pending_count(), 1);
//!
//! barrier.mark_seen(2);
//! assert!(barrier.is_available());
//! ```

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A set of expected names and the subset seen so far.
///
/// - an empty barrier is available immediately (entry nodes);
/// - marking a name twice counts once;
/// - names outside the expected set are ignored.
#[derive(Debug, Clone)]
pub struct NamedBarrierValue<T>
where
    T: Clone + Debug + Hash + Eq,
{
    names: HashSet<T>,
    seen: HashSet<T>,
}

impl<T> NamedBarrierValue<T>
where
    T: Clone + Debug + Hash + Eq,
{
    /// Creates a barrier waiting for `names`.
    pub fn new(names: HashSet<T>) -> Self {
        Self {
            names,
            seen: HashSet::new(),
        }
    }

    /// Creates a barrier from an iterator of names.
    pub fn from_names<I: IntoIterator<Item = T>>(names: I) -> Self {
        Self::new(names.into_iter().collect())
    }

    /// Whether every expected name has been seen.
    pub fn is_available(&self) -> bool {
        self.seen.len() == self.names.len()
    }

    /// Marks `name` as seen. Returns `true` only when the name is expected and was not
    /// seen before.
    pub fn mark_seen(&mut self, name: T) -> bool {
        if !self.names.contains(&name) {
            return false;
        }
        self.seen.insert(name)
    }

    /// Number of expected names not yet seen.
    pub fn pending_count(&self) -> usize {
        self.names.len() - self.seen.len()
    }

    /// Expected names not yet seen.
    pub fn pending_names(&self) -> HashSet<T> {
        self.names.difference(&self.seen).cloned().collect()
    }

    /// All expected names.
    pub fn expected_names(&self) -> &HashSet<T> {
        &self.names
    }
}
