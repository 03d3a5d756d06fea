//! Foundation types for crease.
//!
//! This crate provides the identity, roster, fixture and delivery types used
//! throughout the scoring workspace. Every other crease crate depends on
//! `crease-types`.
//!
//! # Key Types
//!
//! - [`MatchId`], [`TeamId`], [`PlayerId`]: stable string identifiers
//! - [`Team`], [`Player`]: ordered rosters supplied at match setup
//! - [`MatchInfo`]: format, venue, toss and other fixture metadata
//! - [`MatchRules`]: scoring configuration fixed at match creation
//! - [`Delivery`]: one ball bowled, with its [`Extra`] and optional [`Wicket`]

pub mod delivery;
pub mod error;
pub mod fixture;
pub mod identity;
pub mod roster;
pub mod rules;

pub use delivery::{Delivery, DismissalKind, Extra, NoBallRuns, Wicket};
pub use error::TypeError;
pub use fixture::{BallType, MatchFormat, MatchInfo, MatchStatus, PitchType, TossDecision, TossResult};
pub use identity::{MatchId, PlayerId, TeamId};
pub use roster::{Player, PlayerRole, Team};
pub use rules::MatchRules;
