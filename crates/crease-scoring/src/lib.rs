//! Live scoring core for crease.
//!
//! This crate turns a sequence of ball-by-ball events into consistent
//! scoreboard figures. It provides:
//! - The over/ball counter and the extras classifier
//! - Batting and bowling ledgers with derived strike rate and economy
//! - Strike rotation and wicket handling
//! - `InningsState`, its `NotStarted -> InProgress -> Complete` state machine,
//!   and the delivery reducer
//! - An append-only innings event log with deterministic replay and undo
//! - `MatchState`, the explicit local-action / external-replace message split,
//!   match results and the presentation snapshot
//! - The MVP points engine

pub mod counter;
pub mod engine;
pub mod error;
pub mod extras;
pub mod innings;
pub mod ledger;
pub mod points;
pub mod replay;
pub mod result;
pub mod snapshot;
pub mod state;
pub mod strike;
pub mod wicket;

#[cfg(test)]
pub(crate) mod fixtures;

pub use counter::OverBall;
pub use engine::{DeliveryOutcome, InningsContext};
pub use error::{Participant, ScoringError, ScoringResult};
pub use extras::{classify, ExtrasBreakdown, RunSplit};
pub use innings::{CompletionReason, InningsState, InningsStatus, OverTally, TimelineEntry};
pub use ledger::{BattingEntry, BowlingEntry, DismissalRecord};
pub use points::{PlayerPoints, PointsCategory, PointsEvent, PointsRule, PointsTable};
pub use replay::{InningsEvent, Opening, RecordedDelivery};
pub use result::{Margin, MatchResult};
pub use snapshot::{BatterLine, BowlerLine, ScoreboardSnapshot};
pub use state::{ActionOutcome, MatchState, ScoringAction, ScoringMessage};
pub use strike::{Crease, End};
