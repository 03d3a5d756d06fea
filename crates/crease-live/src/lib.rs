//! Live scoring sessions for crease.
//!
//! A [`LiveMatch`] owns one [`MatchState`](crease_scoring::MatchState) and is
//! its single writer. Every scoring message is applied synchronously; the
//! resulting state is then saved by a spawned task so the scorer never waits
//! on storage, and a [`ScoreboardSnapshot`](crease_scoring::ScoreboardSnapshot)
//! is broadcast to viewers.
//!
//! ```text
//! scorer ──► LiveMatch::act ──► MatchState::apply
//!                  │                 │
//!                  │                 ├──► tokio::spawn(repo.save)   (flush() awaits)
//!                  │                 └──► snapshot broadcast
//!                  ▼
//! store push ──► LiveMatch::sync_from ──► ExternalReplace
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::LiveConfig;
pub use error::{LiveError, LiveResult};
pub use session::LiveMatch;
