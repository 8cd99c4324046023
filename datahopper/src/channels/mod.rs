//! State merge channels: per-field reducer policies and the fan-in barrier.
//!
//! - [`Reducible`], [`MergePolicy`], [`FieldWrite`], [`merge`]: fold node updates into state.
//! - [`NamedBarrierValue`]: readiness join used by the executor for fan-in nodes.
//! - [`AggregationError`]: reducer invariant violation.

mod error;
mod named_barrier;
mod reducer;

pub use error::AggregationError;
pub use named_barrier::NamedBarrierValue;
pub use reducer::{merge, FieldWrite, MergePolicy, Reducible, WaveWrites};
