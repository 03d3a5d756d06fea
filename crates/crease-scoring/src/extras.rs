use serde::{Deserialize, Serialize};

use crease_types::{Extra, MatchRules, NoBallRuns};

/// Attribution of the runs scored on one delivery.
///
/// `batsman + extras` is always the amount added to the innings total.
/// `bowler` is what the bowler's figures are charged and can differ from
/// the total (byes) or include extras (wides, no-ball penalties).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSplit {
    pub batsman: u32,
    pub extras: u32,
    pub bowler: u32,
    /// Mandatory wide or no-ball run included in `extras`.
    pub penalty: u32,
}

impl RunSplit {
    pub fn total(&self) -> u32 {
        self.batsman + self.extras
    }
}

/// Split the runs entered for a delivery between batsman, team extras and
/// the bowler's account.
///
/// `runs` are the runs completed by the batsmen (or the boundary value). On
/// a no-ball with byes or leg byes the penalty is charged to the bowler and
/// the ran byes to extras only. Every run on a wide is charged to the bowler.
pub fn classify(extra: Extra, runs: u32, rules: &MatchRules) -> RunSplit {
    let wide_penalty = u32::from(rules.wide_penalty_run);
    let no_ball_penalty = u32::from(rules.no_ball_penalty_run);

    match extra {
        Extra::None => RunSplit {
            batsman: runs,
            extras: 0,
            bowler: runs,
            penalty: 0,
        },
        Extra::Wide if rules.wide_runs_to_batsman => RunSplit {
            batsman: runs,
            extras: wide_penalty,
            bowler: runs + wide_penalty,
            penalty: wide_penalty,
        },
        Extra::Wide => RunSplit {
            batsman: 0,
            extras: runs + wide_penalty,
            bowler: runs + wide_penalty,
            penalty: wide_penalty,
        },
        Extra::NoBall(NoBallRuns::OffBat) => RunSplit {
            batsman: runs,
            extras: no_ball_penalty,
            bowler: runs + no_ball_penalty,
            penalty: no_ball_penalty,
        },
        Extra::NoBall(NoBallRuns::Byes | NoBallRuns::LegByes) => RunSplit {
            batsman: 0,
            extras: runs + no_ball_penalty,
            bowler: no_ball_penalty,
            penalty: no_ball_penalty,
        },
        Extra::Bye | Extra::LegBye => RunSplit {
            batsman: 0,
            extras: runs,
            bowler: 0,
            penalty: 0,
        },
    }
}

/// Team extras by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasBreakdown {
    /// Wide penalties plus runs completed off wides.
    pub wides: u32,
    /// No-ball penalties.
    pub no_balls: u32,
    /// Byes, including byes run off no-balls.
    pub byes: u32,
    /// Leg byes, including leg byes run off no-balls.
    pub leg_byes: u32,
}

impl ExtrasBreakdown {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }

    /// Fold one classified delivery into the breakdown.
    pub fn record(&mut self, extra: Extra, runs: u32, split: &RunSplit) {
        match extra {
            Extra::None => {}
            Extra::Wide => self.wides += split.extras,
            Extra::NoBall(from) => {
                self.no_balls += split.penalty;
                match from {
                    NoBallRuns::OffBat => {}
                    NoBallRuns::Byes => self.byes += runs,
                    NoBallRuns::LegByes => self.leg_byes += runs,
                }
            }
            Extra::Bye => self.byes += runs,
            Extra::LegBye => self.leg_byes += runs,
        }
    }
}
