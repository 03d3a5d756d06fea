//! Per-player running figures within one innings.

use serde::{Deserialize, Serialize};

use crease_types::{DismissalKind, PlayerId};

use crate::counter::OverBall;

/// Round to one decimal place, the precision of scorecard rates.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places, the precision of run rates.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How a batsman was dismissed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalRecord {
    pub kind: DismissalKind,
    pub bowler: PlayerId,
    /// Scorecard text, e.g. `c Ravi b Sarath`.
    pub text: String,
}

/// Batting figures for one batsman.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub not_out: bool,
    pub dismissal: Option<DismissalRecord>,
}

impl BattingEntry {
    pub fn new(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            not_out: true,
            dismissal: None,
        }
    }

    /// Runs per hundred balls, one decimal; 0 before the first ball faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        round1(f64::from(self.runs) * 100.0 / f64::from(self.balls))
    }

    pub fn dismissal_text(&self) -> &str {
        self.dismissal
            .as_ref()
            .map(|d| d.text.as_str())
            .unwrap_or("not out")
    }

    /// Credit one delivery faced on strike.
    pub(crate) fn record_ball(&mut self, runs: u32, faced: bool, boundary_eligible: bool) {
        self.runs += runs;
        if faced {
            self.balls += 1;
        }
        if boundary_eligible {
            match runs {
                4 => self.fours += 1,
                6 => self.sixes += 1,
                _ => {}
            }
        }
    }

    pub(crate) fn dismiss(&mut self, record: DismissalRecord) {
        self.not_out = false;
        self.dismissal = Some(record);
    }
}

/// Bowling figures for one bowler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub legal_balls: u32,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingEntry {
    pub fn new(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            legal_balls: 0,
            maidens: 0,
            runs: 0,
            wickets: 0,
            wides: 0,
            no_balls: 0,
        }
    }

    pub fn overs(&self, balls_per_over: u32) -> OverBall {
        OverBall::from_legal_balls(self.legal_balls, balls_per_over)
    }

    /// Runs conceded per over, one decimal; 0 before the first legal ball.
    pub fn economy(&self, balls_per_over: u32) -> f64 {
        if self.legal_balls == 0 {
            return 0.0;
        }
        round1(f64::from(self.runs) * f64::from(balls_per_over) / f64::from(self.legal_balls))
    }
}
