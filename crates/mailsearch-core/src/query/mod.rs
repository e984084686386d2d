//! Filter predicates and their SQL rendering.
//!
//! Predicates are plain values: build them with [`Predicate::and`] and hand a
//! [`Query`] to a [`MessageStore`](crate::MessageStore).

mod predicate;
pub mod sql;

pub use predicate::{Column, Direction, Predicate, Query, RecipientField, Value};
