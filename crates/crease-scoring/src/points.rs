//! MVP points: a configurable rule table applied to innings ledgers and
//! dismissal attributions.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use crease_types::{DismissalKind, PlayerId};

use crate::innings::InningsState;
use crate::state::MatchState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsCategory {
    Batting,
    Bowling,
    Fielding,
}

impl fmt::Display for PointsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Batting => "batting",
            Self::Bowling => "bowling",
            Self::Fielding => "fielding",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsEvent {
    RunScored,
    Boundary,
    Six,
    HalfCentury,
    Century,
    Duck,
    Wicket,
    MaidenOver,
    Catch,
    Stumping,
    RunOut,
}

impl PointsEvent {
    pub fn category(self) -> PointsCategory {
        match self {
            Self::RunScored
            | Self::Boundary
            | Self::Six
            | Self::HalfCentury
            | Self::Century
            | Self::Duck => PointsCategory::Batting,
            Self::Wicket | Self::MaidenOver => PointsCategory::Bowling,
            Self::Catch | Self::Stumping | Self::RunOut => PointsCategory::Fielding,
        }
    }
}

/// One row of the points table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRule {
    pub category: PointsCategory,
    pub event: PointsEvent,
    pub points: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub description: String,
}

fn default_active() -> bool {
    true
}

impl PointsRule {
    pub fn new(event: PointsEvent, points: i32, description: impl Into<String>) -> Self {
        Self {
            category: event.category(),
            event,
            points,
            active: true,
            description: description.into(),
        }
    }
}

/// Points earned by one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPoints {
    pub player_id: PlayerId,
    pub batting: i32,
    pub bowling: i32,
    pub fielding: i32,
}

impl PlayerPoints {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            batting: 0,
            bowling: 0,
            fielding: 0,
        }
    }

    pub fn total(&self) -> i32 {
        self.batting + self.bowling + self.fielding
    }

    fn add(&mut self, category: PointsCategory, points: i32) {
        match category {
            PointsCategory::Batting => self.batting += points,
            PointsCategory::Bowling => self.bowling += points,
            PointsCategory::Fielding => self.fielding += points,
        }
    }
}

/// The configurable MVP rule table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTable {
    pub rules: Vec<PointsRule>,
}

impl Default for PointsTable {
    fn default() -> Self {
        use PointsEvent::*;
        Self {
            rules: vec![
                PointsRule::new(RunScored, 1, "Each run scored"),
                PointsRule::new(Boundary, 1, "Bonus per four"),
                PointsRule::new(Six, 2, "Bonus per six"),
                PointsRule::new(HalfCentury, 10, "Fifty or more"),
                PointsRule::new(Century, 20, "Hundred or more"),
                PointsRule::new(Duck, -5, "Dismissed for nought"),
                PointsRule::new(Wicket, 20, "Each wicket credited to the bowler"),
                PointsRule::new(MaidenOver, 10, "Each maiden over"),
                PointsRule::new(Catch, 10, "Each catch"),
                PointsRule::new(Stumping, 10, "Each stumping"),
                PointsRule::new(RunOut, 10, "Each run out effected"),
            ],
        }
    }
}

impl PointsTable {
    /// Points awarded for one occurrence of `event`; 0 when inactive.
    pub fn points_for(&self, event: PointsEvent) -> i32 {
        self.rules
            .iter()
            .filter(|r| r.event == event && r.active)
            .map(|r| r.points)
            .sum()
    }

    pub fn set_active(&mut self, event: PointsEvent, active: bool) {
        for rule in self.rules.iter_mut().filter(|r| r.event == event) {
            rule.active = active;
        }
    }

    /// Per-player points for one innings, in order of first involvement.
    pub fn innings_points(&self, innings: &InningsState) -> Vec<PlayerPoints> {
        let mut tally = Tally::default();

        for b in &innings.batting {
            let mut award = |event: PointsEvent, times: u32| {
                tally.award(&b.player_id, event, times, self);
            };
            award(PointsEvent::RunScored, b.runs);
            award(PointsEvent::Boundary, b.fours);
            award(PointsEvent::Six, b.sixes);
            // A hundred passes fifty on the way, so it earns both bonuses.
            if b.runs >= 50 {
                award(PointsEvent::HalfCentury, 1);
            }
            if b.runs >= 100 {
                award(PointsEvent::Century, 1);
            }
            if !b.not_out && b.runs == 0 {
                award(PointsEvent::Duck, 1);
            }

            let fielding = b.dismissal.as_ref().and_then(|d| match &d.kind {
                DismissalKind::Caught { fielder } => Some((fielder, PointsEvent::Catch)),
                DismissalKind::Stumped { keeper } => Some((keeper, PointsEvent::Stumping)),
                DismissalKind::RunOut { fielder: Some(f) } => Some((f, PointsEvent::RunOut)),
                _ => None,
            });
            if let Some((fielder, event)) = fielding {
                tally.award(fielder, event, 1, self);
            }
        }

        for b in &innings.bowling {
            tally.award(&b.player_id, PointsEvent::Wicket, b.wickets, self);
            tally.award(&b.player_id, PointsEvent::MaidenOver, b.maidens, self);
        }
        tally.0
    }

    /// Per-player points summed over every innings of the match, highest
    /// total first.
    pub fn match_points(&self, state: &MatchState) -> Vec<PlayerPoints> {
        let mut totals: Vec<PlayerPoints> = Vec::new();
        for innings in &state.innings {
            for p in self.innings_points(innings) {
                match totals.iter_mut().find(|t| t.player_id == p.player_id) {
                    Some(t) => {
                        t.batting += p.batting;
                        t.bowling += p.bowling;
                        t.fielding += p.fielding;
                    }
                    None => totals.push(p),
                }
            }
        }
        totals.sort_by_key(|p| (Reverse(p.total()), p.player_id.clone()));
        totals
    }
}

#[derive(Default)]
struct Tally(Vec<PlayerPoints>);

impl Tally {
    fn award(&mut self, player: &PlayerId, event: PointsEvent, times: u32, table: &PointsTable) {
        if times == 0 {
            return;
        }
        let idx = match self.0.iter().position(|p| &p.player_id == player) {
            Some(idx) => idx,
            None => {
                self.0.push(PlayerPoints::new(player.clone()));
                self.0.len() - 1
            }
        };
        let points = table.points_for(event) * times as i32;
        self.0[idx].add(event.category(), points);
    }
}
