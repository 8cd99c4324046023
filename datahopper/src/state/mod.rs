//! Shared state of the research graph.
//!
//! [`ResearchState`] is the record every node reads a snapshot of; [`ResearchUpdate`]
//! is the partial record a node returns. The merge policy of each field is fixed in
//! the [`Reducible`](crate::channels::Reducible) impl: everything overwrites except
//! `messages`, which appends.
//!
//! # Example
//!
//! ```rust
//! use datahopper::{Message, ResearchState};
//!
//! let state = ResearchState::new("best budget mechanical keyboard?");
//! assert_eq!(state.messages, vec![Message::user("best budget mechanical keyboard?")]);
//! assert!(state.final_answer.is_none());
//! ```

pub mod research_state;

pub use research_state::{fields, ResearchState, ResearchUpdate};
