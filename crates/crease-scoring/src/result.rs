use std::fmt;

use serde::{Deserialize, Serialize};

use crease_types::{Team, TeamId};

/// Winning margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "by", content = "n")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
    /// The side batting once outscored the other side's two innings.
    InningsAndRuns(u32),
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: u32| if n == 1 { "" } else { "s" };
        match *self {
            Self::Runs(n) => write!(f, "{n} run{}", plural(n)),
            Self::Wickets(n) => write!(f, "{n} wicket{}", plural(n)),
            Self::InningsAndRuns(n) => write!(f, "an innings and {n} run{}", plural(n)),
        }
    }
}

/// Outcome of a completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum MatchResult {
    Won { winner: TeamId, margin: Margin },
    Tied,
    /// The last innings was closed with the chase unfinished.
    Drawn,
}

impl MatchResult {
    pub fn winner(&self) -> Option<&TeamId> {
        match self {
            Self::Won { winner, .. } => Some(winner),
            Self::Tied | Self::Drawn => None,
        }
    }

    /// Result line, e.g. `Thunder won by 4 wickets`.
    pub fn text(&self, teams: &[Team; 2]) -> String {
        match self {
            Self::Won { winner, margin } => {
                let name = teams
                    .iter()
                    .find(|t| &t.id == winner)
                    .map_or_else(|| winner.to_string(), |t| t.name.clone());
                format!("{name} won by {margin}")
            }
            Self::Tied => "Match tied".to_string(),
            Self::Drawn => "Match drawn".to_string(),
        }
    }
}
