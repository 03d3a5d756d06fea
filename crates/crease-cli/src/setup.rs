//! TOML match setup files.
//!
//! ```toml
//! [info]
//! format = "t20"
//! venue = "Riverside"
//!
//! [rules]          # optional; overrides the format's preset
//! overs_limit = 10
//!
//! [[teams]]
//! id = "thd"
//! name = "Thunder"
//! short_name = "THD"
//! players = [{ id = "t1", name = "Sarath", role = "batsman" }]
//! ```

use anyhow::Context;
use serde::Deserialize;

use crease_types::{MatchInfo, MatchRules, Team};

#[derive(Debug, Deserialize)]
pub struct MatchSetup {
    pub info: MatchInfo,
    #[serde(default)]
    pub rules: RuleOverrides,
    pub teams: Vec<Team>,
}

/// Rule fields to change from the format preset.
#[derive(Debug, Default, Deserialize)]
pub struct RuleOverrides {
    pub balls_per_over: Option<u32>,
    pub wickets_limit: Option<u32>,
    pub overs_limit: Option<u32>,
    pub overs_per_bowler: Option<u32>,
    pub innings_per_side: Option<u32>,
    pub wide_penalty_run: Option<bool>,
    pub no_ball_penalty_run: Option<bool>,
    pub wide_runs_to_batsman: Option<bool>,
    pub wide_counts_as_ball_faced: Option<bool>,
}

impl RuleOverrides {
    pub fn apply(&self, mut rules: MatchRules) -> MatchRules {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { rules.$field = v; })*
            };
        }
        overlay!(
            balls_per_over,
            wickets_limit,
            innings_per_side,
            wide_penalty_run,
            no_ball_penalty_run,
            wide_runs_to_batsman,
            wide_counts_as_ball_faced
        );
        if self.overs_limit.is_some() {
            rules.overs_limit = self.overs_limit;
        }
        if self.overs_per_bowler.is_some() {
            rules.overs_per_bowler = self.overs_per_bowler;
        }
        rules
    }
}

impl MatchSetup {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid match setup")
    }

    pub fn rules(&self) -> MatchRules {
        self.rules.apply(MatchRules::for_format(self.info.format))
    }

    pub fn teams(&self) -> anyhow::Result<[Team; 2]> {
        <[Team; 2]>::try_from(self.teams.clone())
            .map_err(|teams| anyhow::anyhow!("a match needs exactly two teams, found {}", teams.len()))
    }
}
