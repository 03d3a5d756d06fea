//! Read-only scoreboard view published after every action.

use serde::{Deserialize, Serialize};

use crease_types::{MatchId, MatchStatus, PlayerId};

use crate::extras::ExtrasBreakdown;
use crate::innings::{InningsState, InningsStatus, TimelineEntry};
use crate::ledger::{BattingEntry, BowlingEntry};
use crate::state::MatchState;

/// A batsman's line on the scoreboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatterLine {
    pub id: PlayerId,
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub on_strike: bool,
}

impl BatterLine {
    fn from_entry(entry: &BattingEntry, on_strike: bool) -> Self {
        Self {
            id: entry.player_id.clone(),
            name: entry.player_name.clone(),
            runs: entry.runs,
            balls: entry.balls,
            fours: entry.fours,
            sixes: entry.sixes,
            strike_rate: entry.strike_rate(),
            on_strike,
        }
    }
}

/// The current bowler's figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BowlerLine {
    pub id: PlayerId,
    pub name: String,
    pub overs: String,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
}

impl BowlerLine {
    fn from_entry(entry: &BowlingEntry, balls_per_over: u32) -> Self {
        Self {
            id: entry.player_id.clone(),
            name: entry.player_name.clone(),
            overs: entry.overs(balls_per_over).to_string(),
            maidens: entry.maidens,
            runs: entry.runs,
            wickets: entry.wickets,
            economy: entry.economy(balls_per_over),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub match_id: MatchId,
    pub match_status: MatchStatus,
    /// Zero before the first innings starts.
    pub innings_number: u32,
    pub innings_status: InningsStatus,
    pub batting_team: Option<String>,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub run_rate: f64,
    pub target: Option<u32>,
    pub required_run_rate: Option<f64>,
    pub extras: ExtrasBreakdown,
    pub striker: Option<BatterLine>,
    pub non_striker: Option<BatterLine>,
    /// Bowler of the current over; the last over's bowler while awaiting
    /// the next selection.
    pub bowler: Option<BowlerLine>,
    pub awaiting_bowler: bool,
    pub timeline: Vec<TimelineEntry>,
    pub result: Option<String>,
}

impl MatchState {
    /// Scoreboard view of the current innings.
    pub fn snapshot(&self) -> ScoreboardSnapshot {
        let bpo = self.rules.balls_per_over;
        let mut snapshot = ScoreboardSnapshot {
            match_id: self.id.clone(),
            match_status: self.status,
            innings_number: 0,
            innings_status: InningsStatus::NotStarted,
            batting_team: None,
            runs: 0,
            wickets: 0,
            overs: "0.0".to_string(),
            run_rate: 0.0,
            target: None,
            required_run_rate: None,
            extras: ExtrasBreakdown::default(),
            striker: None,
            non_striker: None,
            bowler: None,
            awaiting_bowler: false,
            timeline: Vec::new(),
            result: self.result_text(),
        };
        let Some(innings) = self.current_innings() else {
            return snapshot;
        };

        let batter = |id: Option<&PlayerId>, on_strike: bool| {
            id.and_then(|id| innings.batting_entry(id))
                .map(|e| BatterLine::from_entry(e, on_strike))
        };
        snapshot.innings_number = innings.number;
        snapshot.innings_status = innings.status;
        snapshot.batting_team = self.team(&innings.batting_team).map(|t| t.name.clone());
        snapshot.runs = innings.total_runs;
        snapshot.wickets = innings.total_wickets;
        snapshot.overs = innings.counter.to_string();
        snapshot.run_rate = innings.run_rate(bpo);
        snapshot.target = innings.target;
        snapshot.required_run_rate = innings.required_run_rate(bpo, self.rules.balls_limit());
        snapshot.extras = innings.extras;
        snapshot.striker = batter(innings.crease.striker.as_ref(), true);
        snapshot.non_striker = batter(innings.crease.non_striker.as_ref(), false);
        snapshot.bowler = current_bowler(innings)
            .and_then(|id| innings.bowling_entry(id))
            .map(|e| BowlerLine::from_entry(e, bpo));
        snapshot.awaiting_bowler = innings.awaiting_bowler;
        snapshot.timeline = innings.timeline.iter().cloned().collect();
        snapshot
    }
}

fn current_bowler(innings: &InningsState) -> Option<&PlayerId> {
    innings
        .crease
        .bowler
        .as_ref()
        .or(innings.last_over_bowler.as_ref())
}

#[cfg(test)]
mod tests {
    use crease_types::{MatchFormat, MatchInfo, MatchRules};

    use super::*;
    use crate::fixtures;
    use crate::state::ScoringAction;

    fn live_match() -> MatchState {
        let mut m = MatchState::new(
            "m1".into(),
            MatchInfo::new(MatchFormat::T20, "Oval"),
            fixtures::rules(),
            fixtures::teams(),
        )
        .unwrap();
        m.apply(ScoringAction::StartInnings {
            striker: "a1".into(),
            non_striker: "a2".into(),
            bowler: "b11".into(),
        })
        .unwrap();
        m
    }

    #[test]
    fn empty_match_snapshot() {
        let m = MatchState::new(
            "m1".into(),
            MatchInfo::new(MatchFormat::T20, "Oval"),
            MatchRules::default(),
            fixtures::teams(),
        )
        .unwrap();
        let s = m.snapshot();
        assert_eq!(s.innings_number, 0);
        assert_eq!(s.match_status, MatchStatus::Upcoming);
        assert!(s.striker.is_none());
    }

    #[test]
    fn snapshot_reflects_the_crease() {
        let mut m = live_match();
        for b in ["4", "1", "wd"] {
            m.apply(ScoringAction::Deliver(b.parse().unwrap())).unwrap();
        }
        let s = m.snapshot();
        assert_eq!(s.batting_team.as_deref(), Some("Alpha"));
        assert_eq!((s.runs, s.wickets, s.overs.as_str()), (6, 0, "0.2"));
        assert_eq!(s.run_rate, 18.0);
        let striker = s.striker.unwrap();
        assert_eq!(striker.id, PlayerId::from("a2"));
        assert!(striker.on_strike);
        let non_striker = s.non_striker.unwrap();
        assert_eq!((non_striker.runs, non_striker.strike_rate), (5, 250.0));
        let bowler = s.bowler.unwrap();
        assert_eq!((bowler.overs.as_str(), bowler.runs), ("0.2", 6));
        let tokens: Vec<&str> = s.timeline.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(tokens, vec!["4", "1", "wd"]);
    }

    #[test]
    fn awaiting_bowler_still_shows_last_figures() {
        let mut m = live_match();
        for _ in 0..6 {
            m.apply(ScoringAction::Deliver("0".parse().unwrap())).unwrap();
        }
        let s = m.snapshot();
        assert!(s.awaiting_bowler);
        let bowler = s.bowler.unwrap();
        assert_eq!((bowler.overs.as_str(), bowler.maidens), ("1.0", 1));
    }

    #[test]
    fn chase_snapshot_has_required_rate() {
        let rules = MatchRules {
            overs_limit: Some(2),
            overs_per_bowler: Some(1),
            ..MatchRules::default()
        };
        let mut m = MatchState::new(
            "m1".into(),
            MatchInfo::new(MatchFormat::T20, "Oval"),
            rules,
            fixtures::teams(),
        )
        .unwrap();
        m.apply(ScoringAction::StartInnings {
            striker: "a1".into(),
            non_striker: "a2".into(),
            bowler: "b11".into(),
        })
        .unwrap();
        m.apply(ScoringAction::Deliver("6".parse().unwrap())).unwrap();
        m.apply(ScoringAction::CloseInnings).unwrap();
        m.apply(ScoringAction::StartInnings {
            striker: "b1".into(),
            non_striker: "b2".into(),
            bowler: "a11".into(),
        })
        .unwrap();
        let s = m.snapshot();
        assert_eq!(s.target, Some(7));
        assert_eq!(s.required_run_rate, Some(3.5));
    }
}
