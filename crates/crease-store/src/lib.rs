//! Persistence and roster collaborators for crease.
//!
//! The scoring core never performs I/O. It hands a complete `MatchState` to
//! a [`MatchRepository`], which stores it as one JSON document keyed by
//! match id (last write wins) and may push replacements written elsewhere
//! to subscribers.
//!
//! # Backends
//!
//! - [`InMemoryMatchStore`]: `HashMap`-backed; publishes every save to
//!   subscribers, standing in for a push-capable remote
//! - [`FileMatchStore`]: one pretty-printed JSON file per match in a
//!   directory; subscriptions never yield
//!
//! [`RosterProvider`] supplies the ordered player lists used when choosing
//! openers, bowlers and replacement batsmen.

pub mod error;
pub mod file;
pub mod memory;
pub mod roster;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileMatchStore, StoredMatch};
pub use memory::InMemoryMatchStore;
pub use roster::MatchRoster;
pub use traits::{MatchRepository, MatchStream, RosterProvider};
