//! Local persistence for the movie list and offline support.
//!
//! The store keeps exactly one list: the last one the pager merged. It is
//! written wholesale after every successful page and read back when the feed
//! is unreachable at startup.

pub mod record;
mod storage;

pub use storage::{MovieStore, NoopStore, SqliteStore};
