//! Core domain entities for Checkpoint.
//!
//! The backlog only knows one kind of record, the [`Game`]. Its fields are validated on every
//! assignment so an invalid record is never observable.

mod game;

pub use game::{Field, Game, MAX_PRIORITY, MIN_PRIORITY, Ownership, Status};
