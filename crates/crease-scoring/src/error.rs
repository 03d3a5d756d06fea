use std::fmt;

use crease_types::{PlayerId, TeamId};

/// Crease position that must be filled before a ball can be bowled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Participant {
    Striker,
    NonStriker,
    Bowler,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Striker => "striker",
            Self::NonStriker => "non-striker",
            Self::Bowler => "bowler",
        };
        f.write_str(s)
    }
}

/// Errors produced by scoring operations.
///
/// Every error is returned before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid delivery: {0}")]
    InvalidDelivery(String),

    #[error("no {0} assigned")]
    MissingParticipant(Participant),

    #[error("bowler {bowler} is ineligible: {reason}")]
    IneligibleBowler { bowler: PlayerId, reason: String },

    #[error("player {player} is not in team {team}")]
    UnknownPlayer { player: PlayerId, team: TeamId },

    #[error("innings has not started")]
    InningsNotStarted,

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;
