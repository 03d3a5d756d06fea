use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crease_types::{PlayerId, Team, TeamId};

use crate::counter::OverBall;
use crate::extras::ExtrasBreakdown;
use crate::ledger::{round2, BattingEntry, BowlingEntry};
use crate::replay::{InningsEvent, Opening};
use crate::strike::Crease;

/// Deliveries kept in the rolling timeline.
pub const TIMELINE_LEN: usize = 12;

/// Innings state machine: `NotStarted -> InProgress -> Complete`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

impl fmt::Display for InningsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Why an innings ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    AllOut,
    OversExhausted,
    TargetReached,
    Closed,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AllOut => "all out",
            Self::OversExhausted => "overs complete",
            Self::TargetReached => "target reached",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Running figures for the over in progress, used for maidens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverTally {
    /// Deliveries of any kind bowled in the over so far.
    pub deliveries: u32,
    pub legal_balls: u32,
    pub runs_charged: u32,
    /// The bowler changed mid-over; no maiden can be credited.
    pub bowler_changed: bool,
}

/// One row of the recent-deliveries timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Over in which the ball was bowled, zero-based.
    pub over: u32,
    /// Legal ball number within the over after this delivery.
    pub ball: u32,
    pub bowler: PlayerId,
    pub batsman: PlayerId,
    /// Runs added to the innings total.
    pub runs: u32,
    pub is_wicket: bool,
    pub is_boundary: bool,
    pub is_extra: bool,
    /// Keypad token, e.g. `4`, `wd+1`, `W`.
    pub token: String,
    /// Score after the ball, e.g. `142-3`.
    pub score: String,
}

/// One batting turn.
///
/// Every derived figure is produced by the reducer in [`crate::engine`]
/// and can be rebuilt from `opening` and `log` by [`crate::replay`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InningsState {
    /// One-based innings number within the match.
    pub number: u32,
    pub batting_team: TeamId,
    pub bowling_team: TeamId,
    pub status: InningsStatus,
    pub completion: Option<CompletionReason>,
    /// Runs needed to win, set for the side batting last.
    pub target: Option<u32>,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub counter: OverBall,
    pub extras: ExtrasBreakdown,
    pub batting: Vec<BattingEntry>,
    pub bowling: Vec<BowlingEntry>,
    pub crease: Crease,
    /// An over has just completed and no bowler has been picked for the next.
    pub awaiting_bowler: bool,
    /// Bowler of the last completed over; barred from the next one.
    pub last_over_bowler: Option<PlayerId>,
    pub over_tally: OverTally,
    pub timeline: VecDeque<TimelineEntry>,
    pub opening: Option<Opening>,
    pub log: Vec<InningsEvent>,
}

impl InningsState {
    pub fn new(number: u32, batting_team: TeamId, bowling_team: TeamId, target: Option<u32>) -> Self {
        Self {
            number,
            batting_team,
            bowling_team,
            status: InningsStatus::NotStarted,
            completion: None,
            target,
            total_runs: 0,
            total_wickets: 0,
            counter: OverBall::zero(),
            extras: ExtrasBreakdown::default(),
            batting: Vec::new(),
            bowling: Vec::new(),
            crease: Crease::default(),
            awaiting_bowler: false,
            last_over_bowler: None,
            over_tally: OverTally::default(),
            timeline: VecDeque::new(),
            opening: None,
            log: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == InningsStatus::Complete
    }

    pub fn legal_balls(&self, balls_per_over: u32) -> u32 {
        self.counter.legal_balls(balls_per_over)
    }

    /// Score in `runs-wickets` form.
    pub fn score(&self) -> String {
        format!("{}-{}", self.total_runs, self.total_wickets)
    }

    /// Total recomputed from the ledgers: batsmen's runs plus team extras.
    pub fn ledger_total(&self) -> u32 {
        self.batting.iter().map(|b| b.runs).sum::<u32>() + self.extras.total()
    }

    /// Runs per over, two decimals; 0 before the first legal ball.
    pub fn run_rate(&self, balls_per_over: u32) -> f64 {
        let balls = self.legal_balls(balls_per_over);
        if balls == 0 {
            return 0.0;
        }
        round2(f64::from(self.total_runs) * f64::from(balls_per_over) / f64::from(balls))
    }

    /// Runs still needed when chasing.
    pub fn runs_required(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.total_runs))
    }

    /// Required runs per over for the rest of a limited-overs chase.
    pub fn required_run_rate(&self, balls_per_over: u32, balls_limit: Option<u32>) -> Option<f64> {
        let required = self.runs_required()?;
        let remaining = balls_limit?.checked_sub(self.legal_balls(balls_per_over))?;
        if remaining == 0 {
            return None;
        }
        Some(round2(
            f64::from(required) * f64::from(balls_per_over) / f64::from(remaining),
        ))
    }

    pub fn batting_entry(&self, player: &PlayerId) -> Option<&BattingEntry> {
        self.batting.iter().find(|b| &b.player_id == player)
    }

    pub(crate) fn batting_entry_mut(&mut self, player: &PlayerId) -> Option<&mut BattingEntry> {
        self.batting.iter_mut().find(|b| &b.player_id == player)
    }

    pub fn bowling_entry(&self, player: &PlayerId) -> Option<&BowlingEntry> {
        self.bowling.iter().find(|b| &b.player_id == player)
    }

    pub(crate) fn bowling_entry_mut(&mut self, player: &PlayerId) -> Option<&mut BowlingEntry> {
        self.bowling.iter_mut().find(|b| &b.player_id == player)
    }

    pub fn has_batted(&self, player: &PlayerId) -> bool {
        self.batting_entry(player).is_some()
    }

    /// Roster players of the batting side who have not come to the crease,
    /// in batting order.
    pub fn did_not_bat<'t>(&self, batting: &'t Team) -> Vec<&'t PlayerId> {
        batting
            .players
            .iter()
            .map(|p| &p.id)
            .filter(|id| !self.has_batted(id))
            .collect()
    }

    pub fn deliveries(&self) -> usize {
        self.log
            .iter()
            .filter(|e| matches!(e, InningsEvent::Delivery(_)))
            .count()
    }

    pub(crate) fn push_timeline(&mut self, entry: TimelineEntry) {
        if self.timeline.len() == TIMELINE_LEN {
            self.timeline.pop_front();
        }
        self.timeline.push_back(entry);
    }
}
