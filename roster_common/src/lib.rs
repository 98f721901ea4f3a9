//!
//! Common types and pure logic shared by the roster watcher binary.
//!
//! This crate aggregates:
//! - `error` — unified error type `WatchError` used across the workspace.
//! - `result` — handy `Result<T, WatchError>` alias.
//! - `duration` — parser for the page's localized elapsed-time strings.
//! - `roster` — participant records, snapshots, and the presence differ.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod duration;
pub mod roster;

pub use error::WatchError;
pub use result::Result;
