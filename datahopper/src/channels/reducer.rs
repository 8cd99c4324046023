//! Field-scoped state merge.
//!
//! Every state type declares, per field, how a partial update is folded in:
//!
//! - [`MergePolicy::Overwrite`]: the new value replaces the old one;
//! - [`MergePolicy::Append`]: new elements are concatenated after the existing ones.
//!
//! The policy table lives on the state type itself ([`Reducible::written_fields`]),
//! so it is fixed at compile time instead of being looked up from annotations at
//! runtime.
//!
//! # Example
//!
//! ```rust
//! use datahopper::channels::{merge, FieldWrite, Reducible};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Tally { total: Option<u32>, log: Vec<String> }
//!
//! #[derive(Debug, Default)]
//! struct TallyUpdate { total: Option<u32>, log: Vec<String> }
//!
//! impl Reducible for Tally {
//!     type Update = TallyUpdate;
//!
//!     fn written_fields(update: &TallyUpdate) -> Vec<FieldWrite> {
//!         let mut fields = Vec::new();
//!         if update.total.is_some() { fields.push(FieldWrite::overwrite("total")); }
//!         if !update.log.is_empty() { fields.push(FieldWrite::append("log")); }
//!         fields
//!     }
//!
//!     fn apply(&mut self, update: TallyUpdate) {
//!         if let Some(t) = update.total { self.total = Some(t); }
//!         self.log.extend(update.log);
//!     }
//! }
//!
//! let current = Tally::default();
//! let next = merge(&current, vec![
//!     ("a".to_string(), TallyUpdate { total: Some(3), log: vec!["a".into()] }),
//!     ("b".to_string(), TallyUpdate { total: None, log: vec!["b".into()] }),
//! ]).unwrap();
//! assert_eq!(next.total, Some(3));
//! assert_eq!(next.log, vec!["a", "b"]);
//! assert!(current.log.is_empty());
//! ```

use std::collections::HashMap;
use std::fmt::Debug;

use super::AggregationError;

/// How a field's new value is combined with its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// New value replaces the old one. At most one writer per wave.
    Overwrite,
    /// New elements are appended in producer order. Any number of writers.
    Append,
}

/// One field written by a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWrite {
    pub field: &'static str,
    pub policy: MergePolicy,
}

impl FieldWrite {
    pub fn overwrite(field: &'static str) -> Self {
        Self {
            field,
            policy: MergePolicy::Overwrite,
        }
    }

    pub fn append(field: &'static str) -> Self {
        Self {
            field,
            policy: MergePolicy::Append,
        }
    }
}

/// A state record with a statically declared merge policy per field.
///
/// Implemented by the graph's shared state. `Update` is the partial-update record a
/// node returns; it should only be able to express writes to fields nodes own.
pub trait Reducible: Clone + Send + Sync + Debug + 'static {
    /// Partial update produced by one node.
    type Update: Default + Send + Debug + 'static;

    /// Fields the update writes, each with its merge policy.
    fn written_fields(update: &Self::Update) -> Vec<FieldWrite>;

    /// Folds the update into `self` according to each field's policy.
    fn apply(&mut self, update: Self::Update);
}

/// Tracks overwrite-field ownership within one wave.
#[derive(Debug, Default)]
pub struct WaveWrites {
    owners: HashMap<&'static str, String>,
}

impl WaveWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the fields `node_id` writes; fails if an overwrite field already has
    /// an owner in this wave.
    pub fn record(
        &mut self,
        node_id: &str,
        fields: &[FieldWrite],
    ) -> Result<(), AggregationError> {
        for write in fields {
            if write.policy != MergePolicy::Overwrite {
                continue;
            }
            if let Some(first) = self.owners.get(write.field) {
                return Err(AggregationError::ConflictingWrite {
                    field: write.field,
                    first: first.clone(),
                    second: node_id.to_string(),
                });
            }
            self.owners.insert(write.field, node_id.to_string());
        }
        Ok(())
    }
}

/// Merges one wave of `(node_id, update)` pairs into a copy of `current`.
///
/// Updates are applied in iteration order, which the executor sets to completion
/// order. `current` is left untouched so snapshots handed to running nodes never
/// change underneath them.
pub fn merge<S, I>(current: &S, updates: I) -> Result<S, AggregationError>
where
    S: Reducible,
    I: IntoIterator<Item = (String, S::Update)>,
{
    let updates: Vec<(String, S::Update)> = updates.into_iter().collect();
    let mut writes = WaveWrites::new();
    for (node_id, update) in &updates {
        writes.record(node_id, &S::written_fields(update))?;
    }

    let mut next = current.clone();
    for (_, update) in updates {
        next.apply(update);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        title: Option<String>,
        count: Option<i32>,
        messages: Vec<String>,
    }

    #[derive(Debug, Default)]
    struct TestUpdate {
        title: Option<String>,
        count: Option<i32>,
        messages: Vec<String>,
    }

    impl Reducible for TestState {
        type Update = TestUpdate;

        fn written_fields(update: &TestUpdate) -> Vec<FieldWrite> {
            let mut fields = Vec::new();
            if update.title.is_some() {
                fields.push(FieldWrite::overwrite("title"));
            }
            if update.count.is_some() {
                fields.push(FieldWrite::overwrite("count"));
            }
            if !update.messages.is_empty() {
                fields.push(FieldWrite::append("messages"));
            }
            fields
        }

        fn apply(&mut self, update: TestUpdate) {
            if let Some(t) = update.title {
                self.title = Some(t);
            }
            if let Some(c) = update.count {
                self.count = Some(c);
            }
            self.messages.extend(update.messages);
        }
    }

    fn upd(title: Option<&str>, count: Option<i32>, messages: &[&str]) -> TestUpdate {
        TestUpdate {
            title: title.map(String::from),
            count,
            messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// **Scenario**: Overwrite replaces, append concatenates in update order.
    #[test]
    fn merge_overwrites_and_appends() {
        let current = TestState {
            title: Some("old".into()),
            count: None,
            messages: vec!["m0".into()],
        };
        let next = merge(
            &current,
            vec![
                ("a".to_string(), upd(Some("new"), None, &["m1"])),
                ("b".to_string(), upd(None, Some(2), &["m2"])),
            ],
        )
        .unwrap();

        assert_eq!(next.title.as_deref(), Some("new"));
        assert_eq!(next.count, Some(2));
        assert_eq!(next.messages, vec!["m0", "m1", "m2"]);
    }

    /// **Scenario**: The pre-merge state is not modified.
    #[test]
    fn merge_leaves_current_untouched() {
        let current = TestState {
            title: None,
            count: Some(1),
            messages: vec!["keep".into()],
        };
        let before = current.clone();
        let _ = merge(&current, vec![("a".to_string(), upd(Some("t"), Some(9), &["x"]))]).unwrap();
        assert_eq!(current, before);
    }

    /// **Scenario**: Disjoint writers give the same result in any order.
    #[test]
    fn merge_disjoint_writers_commute() {
        let current = TestState::default();
        let ab = merge(
            &current,
            vec![
                ("a".to_string(), upd(Some("t"), None, &[])),
                ("b".to_string(), upd(None, Some(5), &[])),
            ],
        )
        .unwrap();
        let ba = merge(
            &current,
            vec![
                ("b".to_string(), upd(None, Some(5), &[])),
                ("a".to_string(), upd(Some("t"), None, &[])),
            ],
        )
        .unwrap();
        assert_eq!(ab, ba);
    }

    /// **Scenario**: Two writers of the same overwrite field in one wave is an AggregationError.
    #[test]
    fn merge_rejects_conflicting_overwrite() {
        let err = merge(
            &TestState::default(),
            vec![
                ("a".to_string(), upd(Some("x"), None, &[])),
                ("b".to_string(), upd(Some("y"), None, &[])),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AggregationError::ConflictingWrite {
                field: "title",
                first: "a".into(),
                second: "b".into(),
            }
        );
        assert!(err.to_string().contains("title"));
    }

    /// **Scenario**: Many appenders to the same field never conflict.
    #[test]
    fn merge_allows_multiple_appenders() {
        let next = merge(
            &TestState::default(),
            vec![
                ("a".to_string(), upd(None, None, &["1"])),
                ("b".to_string(), upd(None, None, &["2", "3"])),
            ],
        )
        .unwrap();
        assert_eq!(next.messages, vec!["1", "2", "3"]);
    }
}
