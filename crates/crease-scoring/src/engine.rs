//! The innings reducer: every scoring action goes through here, both when
//! entered live and when the event log is replayed.
//!
//! Each operation validates fully before it mutates, so an `Err` always
//! leaves the innings exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crease_types::{Delivery, Extra, MatchRules, NoBallRuns, PlayerId, Team, TeamId};

use crate::error::{Participant, ScoringError, ScoringResult};
use crate::extras::{classify, RunSplit};
use crate::innings::{CompletionReason, InningsState, InningsStatus, OverTally, TimelineEntry};
use crate::ledger::{BattingEntry, BowlingEntry};
use crate::replay::{InningsEvent, Opening, RecordedDelivery};
use crate::strike::should_swap;
use crate::wicket::{apply_wicket, plan_wicket};

/// Most runs the batsmen can complete off one ball.
pub const MAX_RUNS_PER_BALL: u32 = 7;

/// Read-only match data an innings is scored against.
#[derive(Clone, Copy, Debug)]
pub struct InningsContext<'a> {
    pub rules: &'a MatchRules,
    pub batting: &'a Team,
    pub bowling: &'a Team,
}

impl<'a> InningsContext<'a> {
    /// Resolve the batting and fielding sides from the match's two teams.
    pub fn new(rules: &'a MatchRules, teams: &'a [Team; 2], batting: &TeamId) -> ScoringResult<Self> {
        let (batting, bowling) = match teams {
            [a, b] if &a.id == batting => (a, b),
            [a, b] if &b.id == batting => (b, a),
            _ => {
                return Err(ScoringError::InvalidAction(format!(
                    "team {batting} is not playing this match"
                )))
            }
        };
        Ok(Self {
            rules,
            batting,
            bowling,
        })
    }
}

/// What one delivery did to the innings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub split: RunSplit,
    pub over_completed: bool,
    pub wicket_fell: bool,
    pub innings_completed: bool,
}

impl InningsState {
    fn ensure_in_progress(&self) -> ScoringResult<()> {
        match self.status {
            InningsStatus::NotStarted => Err(ScoringError::InningsNotStarted),
            InningsStatus::InProgress => Ok(()),
            InningsStatus::Complete => Err(ScoringError::InvalidDelivery(format!(
                "innings {} is complete",
                self.number
            ))),
        }
    }

    /// Put the openers and the opening bowler in place.
    pub fn start(&mut self, ctx: &InningsContext<'_>, opening: Opening) -> ScoringResult<()> {
        if self.status != InningsStatus::NotStarted {
            return Err(ScoringError::InvalidAction(format!(
                "innings {} has already started",
                self.number
            )));
        }
        for batsman in [&opening.striker, &opening.non_striker] {
            if !ctx.batting.contains(batsman) {
                return Err(ScoringError::UnknownPlayer {
                    player: batsman.clone(),
                    team: ctx.batting.id.clone(),
                });
            }
        }
        if opening.striker == opening.non_striker {
            return Err(ScoringError::InvalidAction(
                "striker and non-striker must be different players".into(),
            ));
        }
        if !ctx.bowling.contains(&opening.bowler) {
            return Err(ScoringError::IneligibleBowler {
                bowler: opening.bowler.clone(),
                reason: format!("not in the fielding side {}", ctx.bowling.id),
            });
        }

        for batsman in [&opening.striker, &opening.non_striker] {
            self.batting
                .push(BattingEntry::new(batsman.clone(), ctx.batting.player_name(batsman)));
        }
        self.crease.striker = Some(opening.striker.clone());
        self.crease.non_striker = Some(opening.non_striker.clone());
        self.crease.bowler = Some(opening.bowler.clone());
        self.status = InningsStatus::InProgress;
        info!(
            innings = self.number,
            batting = %ctx.batting.id,
            striker = %opening.striker,
            non_striker = %opening.non_striker,
            bowler = %opening.bowler,
            "Innings started"
        );
        self.opening = Some(opening);
        Ok(())
    }

    /// Choose the bowler for the next over, or replace the current bowler
    /// mid-over.
    pub fn select_bowler(&mut self, ctx: &InningsContext<'_>, bowler: &PlayerId) -> ScoringResult<()> {
        self.ensure_in_progress()?;
        if !ctx.bowling.contains(bowler) {
            return Err(ScoringError::IneligibleBowler {
                bowler: bowler.clone(),
                reason: format!("not in the fielding side {}", ctx.bowling.id),
            });
        }
        if self.last_over_bowler.as_ref() == Some(bowler) {
            return Err(ScoringError::IneligibleBowler {
                bowler: bowler.clone(),
                reason: "bowled the previous over".into(),
            });
        }
        if let Some(quota) = ctx.rules.overs_per_bowler {
            let bowled = self.bowling_entry(bowler).map_or(0, |e| e.legal_balls);
            if bowled >= quota * ctx.rules.balls_per_over {
                return Err(ScoringError::IneligibleBowler {
                    bowler: bowler.clone(),
                    reason: format!("has bowled the maximum {quota} overs"),
                });
            }
        }

        if self.awaiting_bowler {
            self.over_tally = OverTally::default();
            self.awaiting_bowler = false;
        } else {
            if self.crease.bowler.as_ref() == Some(bowler) {
                return Err(ScoringError::InvalidAction(format!("{bowler} is already bowling")));
            }
            if self.over_tally.deliveries > 0 {
                self.over_tally.bowler_changed = true;
            }
        }
        debug!(innings = self.number, bowler = %bowler, "Bowler selected");
        self.crease.bowler = Some(bowler.clone());
        self.log.push(InningsEvent::BowlerSelected {
            bowler: bowler.clone(),
        });
        Ok(())
    }

    /// Scorer correction: exchange striker and non-striker.
    pub fn swap_strike(&mut self) -> ScoringResult<()> {
        self.ensure_in_progress()?;
        self.crease.swap();
        self.log.push(InningsEvent::StrikeSwapped);
        Ok(())
    }

    /// End the innings by declaration, forfeit or abandonment.
    pub fn close(&mut self) -> ScoringResult<()> {
        self.ensure_in_progress()?;
        self.complete(CompletionReason::Closed);
        self.log.push(InningsEvent::Closed);
        Ok(())
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.status = InningsStatus::Complete;
        self.completion = Some(reason);
        self.awaiting_bowler = false;
        info!(
            innings = self.number,
            score = %self.score(),
            overs = %self.counter,
            reason = %reason,
            "Innings complete"
        );
    }

    /// Apply one ball to the innings.
    pub fn apply_delivery(
        &mut self,
        ctx: &InningsContext<'_>,
        delivery: &Delivery,
    ) -> ScoringResult<DeliveryOutcome> {
        self.ensure_in_progress()?;
        let bpo = ctx.rules.balls_per_over;

        let striker = self
            .crease
            .striker
            .clone()
            .ok_or(ScoringError::MissingParticipant(Participant::Striker))?;
        let non_striker = self
            .crease
            .non_striker
            .clone()
            .ok_or(ScoringError::MissingParticipant(Participant::NonStriker))?;
        let bowler = self
            .crease
            .bowler
            .clone()
            .ok_or(ScoringError::MissingParticipant(Participant::Bowler))?;

        if delivery.runs > MAX_RUNS_PER_BALL {
            return Err(ScoringError::InvalidDelivery(format!(
                "{} runs off one ball",
                delivery.runs
            )));
        }
        let plan = delivery
            .wicket
            .as_ref()
            .map(|w| plan_wicket(self, ctx, w, delivery.extra))
            .transpose()?;

        // Validated; everything below is infallible.
        let split = classify(delivery.extra, delivery.runs, ctx.rules);
        let legal = delivery.is_legal();
        let over_before = self.counter.overs;
        let (counter, over_completed) = self.counter.advance(legal, bpo);
        self.counter = counter;

        let faced = legal || (delivery.extra == Extra::Wide && ctx.rules.wide_counts_as_ball_faced);
        let boundary_eligible = matches!(delivery.extra, Extra::None | Extra::NoBall(NoBallRuns::OffBat));
        if let Some(entry) = self.batting_entry_mut(&striker) {
            entry.record_ball(split.batsman, faced, boundary_eligible);
        }

        if self.bowling_entry(&bowler).is_none() {
            self.bowling
                .push(BowlingEntry::new(bowler.clone(), ctx.bowling.player_name(&bowler)));
        }
        if let Some(entry) = self.bowling_entry_mut(&bowler) {
            entry.runs += split.bowler;
            match delivery.extra {
                Extra::Wide => entry.wides += 1,
                Extra::NoBall(_) => entry.no_balls += 1,
                _ => entry.legal_balls += 1,
            }
        }

        self.over_tally.deliveries += 1;
        self.over_tally.runs_charged += split.bowler;
        if legal {
            self.over_tally.legal_balls += 1;
        }

        self.extras.record(delivery.extra, delivery.runs, &split);
        self.total_runs += split.total();

        let mut all_out = false;
        if let Some(plan) = plan {
            all_out = plan.all_out();
            apply_wicket(self, ctx, plan, &bowler);
            if over_completed {
                self.crease.swap();
            }
        } else if should_swap(delivery.runs, over_completed) {
            self.crease.swap();
        }

        let completion = if self.target.is_some_and(|t| self.total_runs >= t) {
            Some(CompletionReason::TargetReached)
        } else if all_out {
            Some(CompletionReason::AllOut)
        } else if ctx
            .rules
            .balls_limit()
            .is_some_and(|limit| self.counter.legal_balls(bpo) >= limit)
        {
            Some(CompletionReason::OversExhausted)
        } else {
            None
        };

        if over_completed {
            if self.over_tally.legal_balls == bpo
                && self.over_tally.runs_charged == 0
                && !self.over_tally.bowler_changed
            {
                if let Some(entry) = self.bowling_entry_mut(&bowler) {
                    entry.maidens += 1;
                }
            }
            self.last_over_bowler = Some(bowler.clone());
            if completion.is_none() {
                self.crease.bowler = None;
                self.awaiting_bowler = true;
            }
        }

        self.push_timeline(TimelineEntry {
            over: over_before,
            ball: if over_completed { bpo } else { self.counter.balls },
            bowler: bowler.clone(),
            batsman: striker.clone(),
            runs: split.total(),
            is_wicket: delivery.is_wicket(),
            is_boundary: boundary_eligible && matches!(split.batsman, 4 | 6),
            is_extra: delivery.extra != Extra::None,
            token: delivery.to_string(),
            score: self.score(),
        });
        debug!(
            innings = self.number,
            ball = %delivery,
            score = %self.score(),
            overs = %self.counter,
            "Delivery recorded"
        );
        self.log.push(InningsEvent::Delivery(RecordedDelivery {
            delivery: delivery.clone(),
            striker,
            non_striker,
            bowler,
        }));

        if let Some(reason) = completion {
            self.complete(reason);
        }

        Ok(DeliveryOutcome {
            split,
            over_completed,
            wicket_fell: delivery.is_wicket(),
            innings_completed: completion.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crease_types::{DismissalKind, Wicket};
    use proptest::prelude::*;

    use super::*;
    use crate::counter::OverBall;
    use crate::fixtures;

    fn bowl(innings: &mut InningsState, ctx: &InningsContext<'_>, balls: &[&str]) {
        for b in balls {
            let d: Delivery = b.parse().unwrap();
            innings.apply_delivery(ctx, &d).unwrap();
        }
    }

    #[test]
    fn scenario_a_one_over_with_a_wicket() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &["1", "4", "0"]);
        let w = Wicket::new(DismissalKind::Bowled).replaced_by("a3");
        i.apply_delivery(&ctx, &Delivery::dot().with_wicket(w)).unwrap();
        bowl(&mut i, &ctx, &["1", "6"]);

        assert_eq!(i.score(), "12-1");
        assert_eq!(i.counter.to_string(), "1.0");
        assert_eq!(i.ledger_total(), 12);
        assert!(i.awaiting_bowler);
        assert_eq!(i.crease.bowler, None);

        let bowler = i.bowling_entry(&"b11".into()).unwrap();
        assert_eq!((bowler.runs, bowler.wickets, bowler.maidens), (12, 1, 0));
        assert_eq!(bowler.overs(6).to_string(), "1.0");

        // a1 took a single, a2 hit 4, 0 and was bowled; a3 singled, a1 hit 6.
        let a1 = i.batting_entry(&"a1".into()).unwrap();
        assert_eq!((a1.runs, a1.balls, a1.sixes), (7, 2, 1));
        let a2 = i.batting_entry(&"a2".into()).unwrap();
        assert_eq!((a2.runs, a2.balls, a2.fours, a2.not_out), (4, 3, 1, false));
        assert_eq!(a2.dismissal_text(), "b Bravo 11");
        // Six off the last ball keeps a1 at the non-striker's end after the over.
        assert_eq!(i.crease.striker, Some("a3".into()));
        assert_eq!(i.crease.non_striker, Some("a1".into()));
    }

    #[test]
    fn scenario_b_wide_with_runs() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        let out = i.apply_delivery(&ctx, &Delivery::wide(2)).unwrap();
        assert_eq!(out.split.total(), 3);
        assert_eq!(i.extras.wides, 3);
        assert_eq!(i.bowling_entry(&"b11".into()).unwrap().runs, 3);
        assert_eq!(i.counter.to_string(), "0.0");
        assert_eq!(i.batting_entry(&"a1".into()).unwrap().balls, 0);
        // Two runs physically run: no swap.
        assert_eq!(i.crease.striker, Some("a1".into()));
    }

    #[test]
    fn scenario_c_no_ball_hit_for_four() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        i.apply_delivery(&ctx, &Delivery::no_ball(4)).unwrap();
        let a1 = i.batting_entry(&"a1".into()).unwrap();
        assert_eq!((a1.runs, a1.balls, a1.fours), (4, 0, 1));
        assert_eq!(i.extras.no_balls, 1);
        assert_eq!(i.bowling_entry(&"b11".into()).unwrap().runs, 5);
        assert_eq!(i.total_runs, 5);
        assert_eq!(i.counter.to_string(), "0.0");
    }

    #[test]
    fn scenario_d_tenth_wicket_ends_the_innings() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        let bowlers = ["b10", "b11"];

        for n in 0..10u32 {
            let incoming = format!("a{}", n + 3);
            let w = if n < 9 {
                Wicket::new(DismissalKind::Bowled).replaced_by(incoming.as_str())
            } else {
                Wicket::new(DismissalKind::Bowled)
            };
            let out = i.apply_delivery(&ctx, &Delivery::dot().with_wicket(w)).unwrap();
            if out.over_completed && !out.innings_completed {
                let next = bowlers[(n as usize / 6) % 2];
                i.select_bowler(&ctx, &next.into()).unwrap();
            }
        }

        assert_eq!(i.total_wickets, 10);
        assert_eq!(i.status, InningsStatus::Complete);
        assert_eq!(i.completion, Some(CompletionReason::AllOut));
        let before = i.clone();
        assert!(matches!(
            i.apply_delivery(&ctx, &Delivery::runs(1)),
            Err(ScoringError::InvalidDelivery(_))
        ));
        assert!(matches!(i.swap_strike(), Err(ScoringError::InvalidDelivery(_))));
        assert_eq!(i, before);
    }

    #[test]
    fn custom_wicket_limit_ends_the_innings() {
        let teams = fixtures::teams();
        let rules = MatchRules {
            wickets_limit: 3,
            ..fixtures::rules()
        };
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        for incoming in ["a3", "a4"] {
            let w = Wicket::new(DismissalKind::Bowled).replaced_by(incoming);
            let out = i.apply_delivery(&ctx, &Delivery::dot().with_wicket(w)).unwrap();
            assert!(!out.innings_completed);
        }
        let last = Delivery::dot().with_wicket(Wicket::new(DismissalKind::Lbw));
        let out = i.apply_delivery(&ctx, &last).unwrap();

        assert!(out.innings_completed);
        assert_eq!(i.total_wickets, 3);
        assert_eq!(i.status, InningsStatus::Complete);
        assert_eq!(i.completion, Some(CompletionReason::AllOut));
        assert_eq!(i.batting.len(), 4);
        assert!(matches!(
            i.apply_delivery(&ctx, &Delivery::dot()),
            Err(ScoringError::InvalidDelivery(_))
        ));
    }

    #[test]
    fn short_roster_is_all_out_when_no_batsman_remains() {
        let [mut alpha, bravo] = fixtures::teams();
        alpha.players.truncate(4);
        let teams = [alpha, bravo];
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        for incoming in ["a3", "a4"] {
            let w = Wicket::new(DismissalKind::Bowled).replaced_by(incoming);
            i.apply_delivery(&ctx, &Delivery::dot().with_wicket(w)).unwrap();
        }
        let out = i
            .apply_delivery(&ctx, &Delivery::dot().with_wicket(Wicket::new(DismissalKind::Bowled)))
            .unwrap();

        assert!(out.innings_completed);
        assert_eq!(i.total_wickets, 3);
        assert_eq!(i.completion, Some(CompletionReason::AllOut));
        assert!(i.apply_delivery(&ctx, &Delivery::dot()).is_err());
    }

    #[test]
    fn scenario_e_consecutive_overs_rejected() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &[".", ".", ".", ".", ".", "."]);
        let before = i.clone();
        let err = i.select_bowler(&ctx, &"b11".into()).unwrap_err();
        assert!(matches!(err, ScoringError::IneligibleBowler { .. }));
        assert_eq!(i, before);

        i.select_bowler(&ctx, &"b10".into()).unwrap();
        assert!(!i.awaiting_bowler);
        assert_eq!(i.bowling_entry(&"b11".into()).unwrap().maidens, 1);
    }

    #[test]
    fn delivery_rejected_while_awaiting_bowler() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &["1", "1", "1", "1", "1", "1"]);
        assert_eq!(
            i.apply_delivery(&ctx, &Delivery::dot()),
            Err(ScoringError::MissingParticipant(Participant::Bowler))
        );
    }

    #[test]
    fn unstarted_innings_rejects_deliveries() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = InningsState::new(1, teams[0].id.clone(), teams[1].id.clone(), None);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        assert_eq!(
            i.apply_delivery(&ctx, &Delivery::dot()),
            Err(ScoringError::InningsNotStarted)
        );
    }

    #[test]
    fn byes_keep_the_maiden() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &["b4", ".", "lb1", ".", ".", "."]);
        let b = i.bowling_entry(&"b11".into()).unwrap();
        assert_eq!((b.maidens, b.runs), (1, 0));
        assert_eq!(i.total_runs, 5);
        assert_eq!(i.batting_entry(&"a1".into()).unwrap().fours, 0);
    }

    #[test]
    fn mid_over_change_voids_the_maiden() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &[".", "."]);
        i.select_bowler(&ctx, &"b9".into()).unwrap();
        bowl(&mut i, &ctx, &[".", ".", ".", "."]);
        assert_eq!(i.bowling_entry(&"b9".into()).unwrap().maidens, 0);
        assert_eq!(i.bowling_entry(&"b11".into()).unwrap().maidens, 0);
        assert_eq!(i.last_over_bowler, Some("b9".into()));
    }

    #[test]
    fn bowling_quota_enforced() {
        let teams = fixtures::teams();
        let rules = MatchRules {
            overs_per_bowler: Some(1),
            ..fixtures::rules()
        };
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();

        bowl(&mut i, &ctx, &[".", ".", ".", ".", ".", "."]);
        i.select_bowler(&ctx, &"b10".into()).unwrap();
        bowl(&mut i, &ctx, &[".", ".", ".", ".", ".", "."]);
        let err = i.select_bowler(&ctx, &"b11".into()).unwrap_err();
        assert!(matches!(err, ScoringError::IneligibleBowler { .. }));
    }

    #[test]
    fn fielding_side_only() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        bowl(&mut i, &ctx, &[".", ".", ".", ".", ".", "."]);
        assert!(matches!(
            i.select_bowler(&ctx, &"a5".into()),
            Err(ScoringError::IneligibleBowler { .. })
        ));
    }

    #[test]
    fn odd_run_off_the_last_ball_keeps_strike() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        bowl(&mut i, &ctx, &[".", ".", ".", ".", "."]);
        let out = i.apply_delivery(&ctx, &Delivery::runs(1)).unwrap();
        assert!(out.over_completed);
        assert_eq!(i.crease.striker, Some("a1".into()));
    }

    #[test]
    fn wicket_on_the_last_ball_rotates_with_the_over() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        bowl(&mut i, &ctx, &[".", ".", ".", ".", "."]);
        let w = Wicket::new(DismissalKind::Lbw).replaced_by("a3");
        i.apply_delivery(&ctx, &Delivery::dot().with_wicket(w)).unwrap();
        // a3 replaced a1 at the striker's end, then the over rotated strike.
        assert_eq!(i.crease.striker, Some("a2".into()));
        assert_eq!(i.crease.non_striker, Some("a3".into()));
    }

    #[test]
    fn chase_completes_on_target() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = InningsState::new(2, teams[0].id.clone(), teams[1].id.clone(), Some(6));
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        i.start(&ctx, fixtures::opening()).unwrap();
        bowl(&mut i, &ctx, &["4"]);
        let out = i.apply_delivery(&ctx, &Delivery::runs(2)).unwrap();
        assert!(out.innings_completed);
        assert_eq!(i.completion, Some(CompletionReason::TargetReached));
    }

    #[test]
    fn overs_exhausted() {
        let teams = fixtures::teams();
        let rules = MatchRules {
            overs_limit: Some(1),
            overs_per_bowler: None,
            ..MatchRules::default()
        };
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        bowl(&mut i, &ctx, &["1", "2", "wd", "3", "4", "6", "0"]);
        assert_eq!(i.completion, Some(CompletionReason::OversExhausted));
        assert!(!i.awaiting_bowler);
        assert_eq!(i.total_runs, 17);
    }

    #[test]
    fn too_many_runs_rejected() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let mut i = fixtures::started(&teams, &rules);
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        assert!(i.apply_delivery(&ctx, &Delivery::runs(8)).is_err());
        assert_eq!(i.deliveries(), 0);
    }

    #[test]
    fn start_validates_openers() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
        let mut i = InningsState::new(1, teams[0].id.clone(), teams[1].id.clone(), None);

        let same = Opening {
            non_striker: "a1".into(),
            ..fixtures::opening()
        };
        assert!(i.start(&ctx, same).is_err());
        let wrong_side = Opening {
            bowler: "a9".into(),
            ..fixtures::opening()
        };
        assert!(matches!(
            i.start(&ctx, wrong_side),
            Err(ScoringError::IneligibleBowler { .. })
        ));
        assert_eq!(i.status, InningsStatus::NotStarted);
        assert!(i.batting.is_empty());
    }

    #[test]
    fn context_rejects_unknown_team() {
        let teams = fixtures::teams();
        let rules = fixtures::rules();
        assert!(InningsContext::new(&rules, &teams, &"zz".into()).is_err());
        let ctx = InningsContext::new(&rules, &teams, &teams[1].id).unwrap();
        assert_eq!(ctx.bowling.id, teams[0].id);
    }

    fn any_delivery() -> impl Strategy<Value = Delivery> {
        prop_oneof![
            (0u32..=6).prop_map(Delivery::runs),
            (0u32..=4).prop_map(Delivery::wide),
            (0u32..=6).prop_map(Delivery::no_ball),
            (0u32..=4).prop_map(Delivery::no_ball_byes),
            (0u32..=4).prop_map(Delivery::no_ball_leg_byes),
            (1u32..=4).prop_map(Delivery::bye),
            (1u32..=4).prop_map(Delivery::leg_bye),
        ]
    }

    proptest! {
        #[test]
        fn totals_stay_consistent(balls in proptest::collection::vec(any_delivery(), 1..80)) {
            let teams = fixtures::teams();
            let rules = MatchRules::default();
            let mut i = fixtures::started(&teams, &rules);
            let ctx = InningsContext::new(&rules, &teams, &teams[0].id).unwrap();
            let mut legal = 0;
            let mut overs = 0usize;

            for d in &balls {
                let before = i.total_runs;
                let out = i.apply_delivery(&ctx, d).unwrap();
                prop_assert_eq!(i.total_runs - before, out.split.batsman + out.split.extras);
                legal += u32::from(d.is_legal());
                if out.over_completed {
                    overs += 1;
                    let next = if overs % 2 == 1 { "b10" } else { "b11" };
                    i.select_bowler(&ctx, &next.into()).unwrap();
                }
            }

            prop_assert_eq!(i.ledger_total(), i.total_runs);
            prop_assert_eq!(i.counter, OverBall::from_legal_balls(legal, 6));
            let bowled: u32 = i.bowling.iter().map(|b| b.legal_balls).sum();
            prop_assert_eq!(bowled, legal);
            let faced: u32 = i.batting.iter().map(|b| b.balls).sum();
            prop_assert_eq!(faced, legal);
            prop_assert!(i.crease.striker != i.crease.non_striker);
        }
    }
}
