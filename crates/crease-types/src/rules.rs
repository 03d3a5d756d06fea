use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::fixture::MatchFormat;

/// Scoring rules fixed at match creation.
///
/// The scoring core treats these as read-only for the whole match. Every
/// field has a default so partial TOML/JSON documents deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Legal deliveries in an over.
    pub balls_per_over: u32,
    /// Wickets that end an innings.
    pub wickets_limit: u32,
    /// Overs per innings; `None` for timeless formats.
    pub overs_limit: Option<u32>,
    /// Maximum overs a single bowler may bowl in an innings.
    pub overs_per_bowler: Option<u32>,
    /// Innings each side bats.
    pub innings_per_side: u32,
    /// Add the mandatory run for a wide.
    pub wide_penalty_run: bool,
    /// Add the mandatory run for a no-ball.
    pub no_ball_penalty_run: bool,
    /// Credit runs completed off a wide to the striker rather than extras.
    pub wide_runs_to_batsman: bool,
    /// Count a wide as a ball faced by the striker.
    pub wide_counts_as_ball_faced: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            balls_per_over: 6,
            wickets_limit: 10,
            overs_limit: None,
            overs_per_bowler: None,
            innings_per_side: 1,
            wide_penalty_run: true,
            no_ball_penalty_run: true,
            wide_runs_to_batsman: false,
            wide_counts_as_ball_faced: false,
        }
    }
}

impl MatchRules {
    /// Standard rules for a playing format.
    pub fn for_format(format: MatchFormat) -> Self {
        let base = Self::default();
        match format {
            MatchFormat::T20 => Self {
                overs_limit: Some(20),
                overs_per_bowler: Some(4),
                ..base
            },
            MatchFormat::Odi => Self {
                overs_limit: Some(50),
                overs_per_bowler: Some(10),
                ..base
            },
            MatchFormat::Test => Self {
                innings_per_side: 2,
                ..base
            },
            MatchFormat::Box => Self {
                overs_limit: Some(6),
                overs_per_bowler: Some(2),
                wickets_limit: 5,
                ..base
            },
            MatchFormat::TheHundred => Self {
                balls_per_over: 5,
                overs_limit: Some(20),
                overs_per_bowler: Some(4),
                ..base
            },
            MatchFormat::PairCricket => Self {
                overs_limit: Some(16),
                overs_per_bowler: Some(2),
                wickets_limit: 7,
                ..base
            },
        }
    }

    /// Legal deliveries available in an innings, if limited.
    pub fn balls_limit(&self) -> Option<u32> {
        self.overs_limit.map(|o| o * self.balls_per_over)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.balls_per_over == 0 {
            return Err(TypeError::InvalidRules("balls_per_over must be at least 1".into()));
        }
        if self.wickets_limit == 0 {
            return Err(TypeError::InvalidRules("wickets_limit must be at least 1".into()));
        }
        if self.innings_per_side == 0 {
            return Err(TypeError::InvalidRules("innings_per_side must be at least 1".into()));
        }
        if self.overs_limit == Some(0) {
            return Err(TypeError::InvalidRules("overs_limit must be at least 1".into()));
        }
        if let (Some(total), Some(each)) = (self.overs_limit, self.overs_per_bowler) {
            if each == 0 || each > total {
                return Err(TypeError::InvalidRules(format!(
                    "overs_per_bowler {each} outside 1..={total}"
                )));
            }
        }
        Ok(())
    }
}
