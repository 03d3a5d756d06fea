//! Match-level state and the single entry point for scoring messages.

use serde::{Deserialize, Serialize};
use tracing::info;

use crease_types::{
    Delivery, MatchId, MatchInfo, MatchRules, MatchStatus, PlayerId, Team, TeamId, TossDecision,
};

use crate::engine::{DeliveryOutcome, InningsContext};
use crate::error::{ScoringError, ScoringResult};
use crate::innings::{CompletionReason, InningsState};
use crate::replay::Opening;
use crate::result::{Margin, MatchResult};

/// An action entered by the local scorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ScoringAction {
    /// Begin the next innings with its openers and opening bowler.
    StartInnings {
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    Deliver(Delivery),
    SelectBowler { bowler: PlayerId },
    SwapStrike,
    CloseInnings,
    Undo,
    /// Discard the current innings entirely.
    ResetInnings,
}

/// Everything that can change a [`MatchState`].
///
/// Local actions go through the reducer. An external replacement is a full
/// state pushed by the store and is taken as-is (last writer wins).
#[derive(Clone, Debug, PartialEq)]
pub enum ScoringMessage {
    Local(ScoringAction),
    ExternalReplace(Box<MatchState>),
}

/// What a message did to the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub delivery: Option<DeliveryOutcome>,
    pub innings_completed: bool,
    pub match_completed: bool,
    pub replaced: bool,
}

/// Full scoring state of one match; the unit of persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub id: MatchId,
    pub info: MatchInfo,
    pub rules: MatchRules,
    /// Both sides; order is only meaningful when there is no toss.
    pub teams: [Team; 2],
    pub status: MatchStatus,
    pub innings: Vec<InningsState>,
    pub result: Option<MatchResult>,
    /// Bumped on every accepted local action.
    pub revision: u64,
}

impl MatchState {
    pub fn new(id: MatchId, info: MatchInfo, rules: MatchRules, teams: [Team; 2]) -> ScoringResult<Self> {
        rules
            .validate()
            .map_err(|e| ScoringError::InvalidAction(e.to_string()))?;
        if teams[0].id == teams[1].id {
            return Err(ScoringError::InvalidAction(format!(
                "both sides have team id {}",
                teams[0].id
            )));
        }
        if let Some(p) = teams[0].players.iter().find(|p| teams[1].contains(&p.id)) {
            return Err(ScoringError::InvalidAction(format!(
                "player {} is listed for both sides",
                p.id
            )));
        }
        Ok(Self {
            id,
            info,
            rules,
            teams,
            status: MatchStatus::Upcoming,
            innings: Vec::new(),
            result: None,
            revision: 0,
        })
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn current_innings(&self) -> Option<&InningsState> {
        self.innings.last()
    }

    /// Innings each match is scheduled to have.
    pub fn scheduled_innings(&self) -> usize {
        self.rules.innings_per_side as usize * 2
    }

    /// Context for scoring one of this match's innings.
    pub fn context_for(&self, innings: &InningsState) -> ScoringResult<InningsContext<'_>> {
        InningsContext::new(&self.rules, &self.teams, &innings.batting_team)
    }

    /// Runs scored by a side across all its innings.
    pub fn aggregate(&self, team: &TeamId) -> u32 {
        self.innings
            .iter()
            .filter(|i| &i.batting_team == team)
            .map(|i| i.total_runs)
            .sum()
    }

    /// Index into `teams` of the side batting first: the toss winner's
    /// choice, or the first listed team when no toss was recorded.
    fn first_batting_index(&self) -> usize {
        let Some(toss) = &self.info.toss else {
            return 0;
        };
        let Some(winner) = self.teams.iter().position(|t| t.id == toss.winner) else {
            return 0;
        };
        match toss.decision {
            TossDecision::Bat => winner,
            TossDecision::Bowl => 1 - winner,
        }
    }

    /// Index into `teams` of the side batting in innings `number` (one-based).
    fn batting_index_for(&self, number: usize) -> usize {
        let first = self.first_batting_index();
        if number % 2 == 1 {
            first
        } else {
            1 - first
        }
    }

    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(|r| r.text(&self.teams))
    }

    /// Hex BLAKE3 digest of the serialized state.
    pub fn fingerprint(&self) -> ScoringResult<String> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| ScoringError::Serialization(e.to_string()))?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    /// Apply a scoring message.
    pub fn dispatch(&mut self, message: ScoringMessage) -> ScoringResult<ActionOutcome> {
        match message {
            ScoringMessage::Local(action) => self.apply(action),
            ScoringMessage::ExternalReplace(state) => {
                *self = *state;
                Ok(ActionOutcome {
                    replaced: true,
                    ..ActionOutcome::default()
                })
            }
        }
    }

    /// Apply one local action. On error the state is unchanged.
    pub fn apply(&mut self, action: ScoringAction) -> ScoringResult<ActionOutcome> {
        let reopens = matches!(action, ScoringAction::Undo | ScoringAction::ResetInnings);
        if self.status == MatchStatus::Completed && !reopens {
            return Err(ScoringError::InvalidAction("the match is complete".into()));
        }
        let was_complete = self
            .current_innings()
            .map(|i| (i.number, i.is_complete()));

        let mut outcome = ActionOutcome::default();
        match action {
            ScoringAction::StartInnings {
                striker,
                non_striker,
                bowler,
            } => self.start_innings(Opening {
                striker,
                non_striker,
                bowler,
            })?,
            ScoringAction::Deliver(delivery) => {
                let delivered = self.with_current(|i, ctx| i.apply_delivery(ctx, &delivery))?;
                outcome.delivery = Some(delivered);
            }
            ScoringAction::SelectBowler { bowler } => {
                self.with_current(|i, ctx| i.select_bowler(ctx, &bowler))?
            }
            ScoringAction::SwapStrike => self.with_current(|i, _| i.swap_strike())?,
            ScoringAction::CloseInnings => self.with_current(|i, _| i.close())?,
            ScoringAction::Undo => {
                self.with_current(|i, ctx| i.undo_last(ctx))?;
            }
            ScoringAction::ResetInnings => self.reset_innings()?,
        }
        self.revision += 1;

        let now_complete = self
            .current_innings()
            .map(|i| (i.number, i.is_complete()));
        outcome.innings_completed = match (was_complete, now_complete) {
            (Some((before, false)), Some((after, true))) => before == after,
            _ => false,
        };

        let was_match_complete = self.status == MatchStatus::Completed;
        self.settle();
        outcome.match_completed = !was_match_complete && self.status == MatchStatus::Completed;
        Ok(outcome)
    }

    fn with_current<T>(
        &mut self,
        f: impl FnOnce(&mut InningsState, &InningsContext<'_>) -> ScoringResult<T>,
    ) -> ScoringResult<T> {
        let Self {
            rules,
            teams,
            innings,
            ..
        } = self;
        let current = innings.last_mut().ok_or(ScoringError::InningsNotStarted)?;
        let ctx = InningsContext::new(rules, teams, &current.batting_team)?;
        f(current, &ctx)
    }

    fn start_innings(&mut self, opening: Opening) -> ScoringResult<()> {
        if let Some(current) = self.current_innings() {
            if !current.is_complete() {
                return Err(ScoringError::InvalidAction(format!(
                    "innings {} is still in progress",
                    current.number
                )));
            }
        }
        let number = self.innings.len() + 1;
        let scheduled = self.scheduled_innings();
        if number > scheduled {
            return Err(ScoringError::InvalidAction(format!(
                "all {scheduled} innings have been played"
            )));
        }

        let bat = self.batting_index_for(number);
        let batting = self.teams[bat].id.clone();
        let bowling = self.teams[1 - bat].id.clone();
        let target = (number == scheduled)
            .then(|| (self.aggregate(&bowling) + 1).saturating_sub(self.aggregate(&batting)));

        let mut innings = InningsState::new(number as u32, batting, bowling, target);
        let ctx = self.context_for(&innings)?;
        innings.start(&ctx, opening)?;
        self.innings.push(innings);

        if self.status == MatchStatus::Upcoming {
            self.status = MatchStatus::Live;
            info!(match_id = %self.id, "Match live");
        }
        Ok(())
    }

    fn reset_innings(&mut self) -> ScoringResult<()> {
        let dropped = self.innings.pop().ok_or(ScoringError::InningsNotStarted)?;
        info!(match_id = %self.id, innings = dropped.number, "Innings reset");
        if self.innings.is_empty() {
            self.status = MatchStatus::Upcoming;
        }
        Ok(())
    }

    /// Bring `status` and `result` in line with the innings.
    fn settle(&mut self) {
        match self.decide_result() {
            Some(result) => {
                if self.status != MatchStatus::Completed {
                    info!(match_id = %self.id, result = %result.text(&self.teams), "Match completed");
                }
                self.status = MatchStatus::Completed;
                self.result = Some(result);
            }
            None => {
                if self.status == MatchStatus::Completed {
                    info!(match_id = %self.id, "Match reopened");
                    self.status = MatchStatus::Live;
                }
                self.result = None;
            }
        }
    }

    fn decide_result(&self) -> Option<MatchResult> {
        let last = self.current_innings().filter(|i| i.is_complete())?;
        let played = self.innings.len();
        let scheduled = self.scheduled_innings();

        if played == scheduled {
            let chasing = self.aggregate(&last.batting_team);
            let defending = self.aggregate(&last.bowling_team);
            let closed = last.completion == Some(CompletionReason::Closed);
            return Some(if chasing > defending {
                MatchResult::Won {
                    winner: last.batting_team.clone(),
                    margin: Margin::Wickets(self.rules.wickets_limit.saturating_sub(last.total_wickets)),
                }
            } else if closed {
                MatchResult::Drawn
            } else if chasing < defending {
                MatchResult::Won {
                    winner: last.bowling_team.clone(),
                    margin: Margin::Runs(defending - chasing),
                }
            } else {
                MatchResult::Tied
            });
        }

        // The side due to bat last already leads the side that has batted twice.
        if scheduled > 2 && played + 1 == scheduled {
            let once = &self.teams[self.batting_index_for(scheduled)].id;
            let twice = &last.batting_team;
            let (lead, trail) = (self.aggregate(once), self.aggregate(twice));
            if lead > trail {
                return Some(MatchResult::Won {
                    winner: once.clone(),
                    margin: Margin::InningsAndRuns(lead - trail),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crease_types::{MatchFormat, TossResult};

    use super::*;
    use crate::fixtures;

    fn one_over_rules() -> MatchRules {
        MatchRules {
            overs_limit: Some(1),
            overs_per_bowler: Some(1),
            ..MatchRules::default()
        }
    }

    fn new_match(rules: MatchRules) -> MatchState {
        MatchState::new(
            "m1".into(),
            MatchInfo::new(MatchFormat::T20, "Oval"),
            rules,
            fixtures::teams(),
        )
        .unwrap()
    }

    fn open(m: &mut MatchState) -> ActionOutcome {
        let batting = m.batting_index_for(m.innings.len() + 1);
        let (bat, bowl) = if batting == 0 { ("a", "b") } else { ("b", "a") };
        m.apply(ScoringAction::StartInnings {
            striker: format!("{bat}1").as_str().into(),
            non_striker: format!("{bat}2").as_str().into(),
            bowler: format!("{bowl}11").as_str().into(),
        })
        .unwrap()
    }

    fn balls(m: &mut MatchState, balls: &[&str]) -> ActionOutcome {
        let mut last = ActionOutcome::default();
        for b in balls {
            last = m.apply(ScoringAction::Deliver(b.parse().unwrap())).unwrap();
        }
        last
    }

    #[test]
    fn chase_won_by_wickets() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        assert_eq!(m.status, MatchStatus::Live);
        let out = balls(&mut m, &["1", "4", "6", ".", ".", "2"]);
        assert!(out.innings_completed);
        assert!(!out.match_completed);

        open(&mut m);
        assert_eq!(m.innings[1].batting_team, TeamId::from("b"));
        assert_eq!(m.innings[1].target, Some(14));
        let out = balls(&mut m, &["6", "6", "1", "1"]);
        assert!(out.innings_completed);
        assert!(out.match_completed);
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.result_text().as_deref(), Some("Bravo won by 10 wickets"));
        assert!(m.apply(ScoringAction::SwapStrike).is_err());
    }

    #[test]
    fn defended_total_wins_by_runs() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "4", "6", ".", ".", "2"]);
        open(&mut m);
        balls(&mut m, &["1", ".", ".", ".", ".", "."]);
        assert_eq!(m.result_text().as_deref(), Some("Alpha won by 12 runs"));
    }

    #[test]
    fn level_scores_tie() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "4", "6", ".", ".", "2"]);
        open(&mut m);
        balls(&mut m, &["6", "6", "1", ".", ".", "."]);
        assert_eq!(m.result, Some(MatchResult::Tied));
    }

    #[test]
    fn toss_decides_who_bats_first() {
        let mut m = new_match(one_over_rules());
        m.info.toss = Some(TossResult {
            winner: "a".into(),
            decision: TossDecision::Bowl,
        });
        open(&mut m);
        assert_eq!(m.innings[0].batting_team, TeamId::from("b"));
    }

    #[test]
    fn next_innings_waits_for_the_current_one() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        let before = m.clone();
        let err = m.apply(ScoringAction::StartInnings {
            striker: "b1".into(),
            non_striker: "b2".into(),
            bowler: "a11".into(),
        });
        assert!(matches!(err, Err(ScoringError::InvalidAction(_))));
        assert_eq!(m, before);
    }

    #[test]
    fn actions_before_the_first_innings_are_rejected() {
        let mut m = new_match(one_over_rules());
        assert_eq!(
            m.apply(ScoringAction::Deliver(Delivery::dot())),
            Err(ScoringError::InningsNotStarted)
        );
        assert_eq!(m.revision, 0);
    }

    #[test]
    fn undo_reopens_a_completed_match() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "4", "6", ".", ".", "2"]);
        open(&mut m);
        balls(&mut m, &["6", "6", "1", "1"]);
        assert_eq!(m.status, MatchStatus::Completed);

        m.apply(ScoringAction::Undo).unwrap();
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.result, None);
        assert_eq!(m.innings[1].total_runs, 13);
        balls(&mut m, &["4"]);
        assert_eq!(m.result_text().as_deref(), Some("Bravo won by 10 wickets"));
    }

    #[test]
    fn external_replace_is_idempotent() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "wd", "4"]);

        let mut remote = m.clone();
        remote
            .apply(ScoringAction::Deliver(Delivery::runs(6)))
            .unwrap();

        let out = m
            .dispatch(ScoringMessage::ExternalReplace(Box::new(remote.clone())))
            .unwrap();
        assert!(out.replaced);
        assert_eq!(m, remote);
        let once = m.fingerprint().unwrap();
        m.dispatch(ScoringMessage::ExternalReplace(Box::new(remote.clone())))
            .unwrap();
        assert_eq!(m, remote);
        assert_eq!(m.fingerprint().unwrap(), once);
    }

    #[test]
    fn fingerprint_tracks_changes() {
        let mut m = new_match(one_over_rules());
        let a = m.fingerprint().unwrap();
        assert_eq!(a.len(), 64);
        assert_eq!(m.clone().fingerprint().unwrap(), a);
        open(&mut m);
        assert_ne!(m.fingerprint().unwrap(), a);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "nb+b2", "lb1"]);
        let json = serde_json::to_string_pretty(&m).unwrap();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn two_innings_match_target_and_innings_victory() {
        let rules = MatchRules {
            innings_per_side: 2,
            overs_limit: Some(1),
            overs_per_bowler: None,
            ..MatchRules::default()
        };

        let mut m = new_match(rules.clone());
        open(&mut m);
        balls(&mut m, &["4", "4", "2", ".", ".", "."]);
        open(&mut m);
        balls(&mut m, &["4", "1", ".", ".", ".", "."]);
        open(&mut m);
        balls(&mut m, &["6", "4", ".", ".", ".", "."]);
        open(&mut m);
        // 20 by Alpha against 5 by Bravo so far.
        assert_eq!(m.innings[3].target, Some(16));

        let mut m = new_match(rules);
        open(&mut m);
        balls(&mut m, &[".", ".", ".", ".", ".", "."]);
        open(&mut m);
        balls(&mut m, &["6", "6", "6", "6", "6", "6"]);
        open(&mut m);
        let out = balls(&mut m, &["1", ".", ".", ".", ".", "."]);
        assert!(out.match_completed);
        assert_eq!(
            m.result_text().as_deref(),
            Some("Bravo won by an innings and 35 runs")
        );
        assert!(m.apply(ScoringAction::StartInnings {
            striker: "b1".into(),
            non_striker: "b2".into(),
            bowler: "a11".into(),
        })
        .is_err());
    }

    #[test]
    fn closing_the_chase_short_is_a_draw() {
        let mut m = new_match(MatchRules {
            overs_limit: None,
            overs_per_bowler: None,
            ..MatchRules::default()
        });
        open(&mut m);
        balls(&mut m, &["4"]);
        m.apply(ScoringAction::CloseInnings).unwrap();
        open(&mut m);
        balls(&mut m, &["1"]);
        let out = m.apply(ScoringAction::CloseInnings).unwrap();
        assert!(out.match_completed);
        assert_eq!(m.result, Some(MatchResult::Drawn));
    }

    #[test]
    fn rejects_shared_players() {
        let [a, mut b] = fixtures::teams();
        b.players.push(a.players[0].clone());
        let err = MatchState::new(
            "m2".into(),
            MatchInfo::new(MatchFormat::T20, "Oval"),
            MatchRules::default(),
            [a, b],
        );
        assert!(err.is_err());
    }

    #[test]
    fn actions_serialize_with_tags() {
        let json = serde_json::to_string(&ScoringAction::SelectBowler { bowler: "b9".into() }).unwrap();
        assert_eq!(json, r#"{"action":"select_bowler","bowler":"b9"}"#);
        let back: ScoringAction = serde_json::from_str(r#"{"action":"undo"}"#).unwrap();
        assert_eq!(back, ScoringAction::Undo);
    }

    #[test]
    fn reset_discards_the_current_innings() {
        let mut m = new_match(one_over_rules());
        open(&mut m);
        balls(&mut m, &["1", "4", "6", ".", ".", "2"]);
        let after_first = m.clone();
        open(&mut m);
        balls(&mut m, &["6", "6", "1", "1"]);
        assert_eq!(m.status, MatchStatus::Completed);

        let out = m.apply(ScoringAction::ResetInnings).unwrap();
        assert!(!out.innings_completed);
        assert_eq!(m.innings, after_first.innings);
        assert_eq!(m.status, MatchStatus::Live);
        assert!(m.result.is_none());

        m.apply(ScoringAction::ResetInnings).unwrap();
        assert!(m.innings.is_empty());
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(
            m.apply(ScoringAction::ResetInnings),
            Err(ScoringError::InningsNotStarted)
        );
    }
}
