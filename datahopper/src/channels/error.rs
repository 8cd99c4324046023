//! Reducer errors.

use thiserror::Error;

/// A merge invariant was violated while folding one wave into the shared state.
///
/// This indicates a graph-design defect (two independent nodes own the same
/// field), not a runtime condition; the run is aborted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// Two nodes of the same wave both wrote an overwrite field.
    #[error("field `{field}` written by both `{first}` and `{second}` in the same wave")]
    ConflictingWrite {
        field: &'static str,
        first: String,
        second: String,
    },
}
