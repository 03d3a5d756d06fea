//! One ball bowled and the closed set of outcomes it can carry.
//!
//! Extras and dismissals are exhaustive enums so every code path that
//! attributes runs or credits a wicket is checked at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::PlayerId;

/// How runs completed on a no-ball were scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoBallRuns {
    /// Hit off the bat; credited to the striker.
    #[default]
    OffBat,
    Byes,
    LegByes,
}

/// Extra classification of a delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "runs_from")]
pub enum Extra {
    #[default]
    None,
    Wide,
    NoBall(NoBallRuns),
    Bye,
    LegBye,
}

impl Extra {
    /// A legal delivery consumes one ball of the over.
    pub fn is_legal(self) -> bool {
        !matches!(self, Self::Wide | Self::NoBall(_))
    }

    /// Runs completed on this delivery were not hit off the bat.
    pub fn is_bye_kind(self) -> bool {
        matches!(
            self,
            Self::Bye | Self::LegBye | Self::NoBall(NoBallRuns::Byes | NoBallRuns::LegByes)
        )
    }
}

/// Mode of dismissal, with the fielder attribution where one applies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DismissalKind {
    Bowled,
    Caught { fielder: PlayerId },
    Lbw,
    Stumped { keeper: PlayerId },
    RunOut { fielder: Option<PlayerId> },
    HitWicket,
    ObstructingField,
    RetiredOut,
}

impl DismissalKind {
    /// Whether the bowler's wicket tally is credited.
    pub fn credited_to_bowler(&self) -> bool {
        match self {
            Self::Bowled | Self::Caught { .. } | Self::Lbw | Self::Stumped { .. } | Self::HitWicket => {
                true
            }
            Self::RunOut { .. } | Self::ObstructingField | Self::RetiredOut => false,
        }
    }

    /// Whether this dismissal can fall on a delivery with the given extra.
    ///
    /// On a wide only stumping, hit wicket, run out and obstruction are
    /// possible; on a no-ball only run out and obstruction.
    pub fn allowed_on(&self, extra: Extra) -> bool {
        match extra {
            Extra::Wide => matches!(
                self,
                Self::Stumped { .. } | Self::HitWicket | Self::RunOut { .. } | Self::ObstructingField
            ),
            Extra::NoBall(_) => matches!(self, Self::RunOut { .. } | Self::ObstructingField),
            Extra::None | Extra::Bye | Extra::LegBye => true,
        }
    }

    /// Whether the non-striker can be the dismissed batsman.
    pub fn can_dismiss_non_striker(&self) -> bool {
        matches!(
            self,
            Self::RunOut { .. } | Self::ObstructingField | Self::RetiredOut
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught { .. } => "caught",
            Self::Lbw => "lbw",
            Self::Stumped { .. } => "stumped",
            Self::RunOut { .. } => "run out",
            Self::HitWicket => "hit wicket",
            Self::ObstructingField => "obstructing the field",
            Self::RetiredOut => "retired out",
        }
    }
}

/// A wicket falling on a delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wicket {
    pub kind: DismissalKind,
    /// Dismissed batsman; the striker when `None`.
    #[serde(default)]
    pub player_out: Option<PlayerId>,
    /// Replacement batsman, required while eligible batsmen remain.
    #[serde(default)]
    pub incoming: Option<PlayerId>,
}

impl Wicket {
    pub fn new(kind: DismissalKind) -> Self {
        Self {
            kind,
            player_out: None,
            incoming: None,
        }
    }

    pub fn of(mut self, player: impl Into<PlayerId>) -> Self {
        self.player_out = Some(player.into());
        self
    }

    pub fn replaced_by(mut self, player: impl Into<PlayerId>) -> Self {
        self.incoming = Some(player.into());
        self
    }
}

/// One ball bowled, as entered by the scorer.
///
/// `runs` are the runs physically completed by the batsmen (or the boundary
/// value); mandatory wide and no-ball runs are never included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub runs: u32,
    #[serde(default)]
    pub extra: Extra,
    #[serde(default)]
    pub wicket: Option<Wicket>,
}

impl Delivery {
    pub fn runs(runs: u32) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    pub fn dot() -> Self {
        Self::runs(0)
    }

    pub fn wide(runs: u32) -> Self {
        Self {
            runs,
            extra: Extra::Wide,
            wicket: None,
        }
    }

    pub fn no_ball(runs_off_bat: u32) -> Self {
        Self {
            runs: runs_off_bat,
            extra: Extra::NoBall(NoBallRuns::OffBat),
            wicket: None,
        }
    }

    pub fn no_ball_byes(byes: u32) -> Self {
        Self {
            runs: byes,
            extra: Extra::NoBall(NoBallRuns::Byes),
            wicket: None,
        }
    }

    pub fn no_ball_leg_byes(leg_byes: u32) -> Self {
        Self {
            runs: leg_byes,
            extra: Extra::NoBall(NoBallRuns::LegByes),
            wicket: None,
        }
    }

    pub fn bye(runs: u32) -> Self {
        Self {
            runs,
            extra: Extra::Bye,
            wicket: None,
        }
    }

    pub fn leg_bye(runs: u32) -> Self {
        Self {
            runs,
            extra: Extra::LegBye,
            wicket: None,
        }
    }

    pub fn with_wicket(mut self, wicket: Wicket) -> Self {
        self.wicket = Some(wicket);
        self
    }

    pub fn is_legal(&self) -> bool {
        self.extra.is_legal()
    }

    pub fn is_wicket(&self) -> bool {
        self.wicket.is_some()
    }
}

/// Timeline token: `4`, `wd+2`, `nb+b1`, `lb2`, `W`, `1+W`.
impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match (self.extra, self.runs) {
            (Extra::None, r) => r.to_string(),
            (Extra::Wide, 0) => "wd".to_string(),
            (Extra::Wide, r) => format!("wd+{r}"),
            (Extra::NoBall(_), 0) => "nb".to_string(),
            (Extra::NoBall(NoBallRuns::OffBat), r) => format!("nb+{r}"),
            (Extra::NoBall(NoBallRuns::Byes), r) => format!("nb+b{r}"),
            (Extra::NoBall(NoBallRuns::LegByes), r) => format!("nb+lb{r}"),
            (Extra::Bye, r) => format!("b{r}"),
            (Extra::LegBye, r) => format!("lb{r}"),
        };
        match (&self.wicket, self.extra, self.runs) {
            (None, _, _) => f.write_str(&base),
            (Some(_), Extra::None, 0) => f.write_str("W"),
            (Some(_), _, _) => write!(f, "{base}+W"),
        }
    }
}

/// Parses the scorer keypad notation for the run and extra part of a ball.
///
/// Wickets carry a dismissal and replacement and are attached separately
/// with [`Delivery::with_wicket`].
impl FromStr for Delivery {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let fail = |reason: &str| TypeError::InvalidNotation {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let count = |digits: &str| -> Result<u32, TypeError> {
            if digits.is_empty() || digits.len() > 2 {
                return Err(fail("expected a run count"));
            }
            digits.parse::<u32>().map_err(|_| fail("expected a run count"))
        };

        if input == "." {
            return Ok(Self::dot());
        }
        if input.contains('w') && !input.starts_with("wd") {
            return Err(fail("wickets need a dismissal kind"));
        }
        if let Some(rest) = input.strip_prefix("wd") {
            return match rest.strip_prefix('+') {
                None if rest.is_empty() => Ok(Self::wide(0)),
                Some(n) => Ok(Self::wide(count(n)?)),
                None => Err(fail("expected `wd` or `wd+N`")),
            };
        }
        if let Some(rest) = input.strip_prefix("nb") {
            if rest.is_empty() {
                return Ok(Self::no_ball(0));
            }
            let Some(rest) = rest.strip_prefix('+') else {
                return Err(fail("expected `nb`, `nb+N`, `nb+bN` or `nb+lbN`"));
            };
            if let Some(n) = rest.strip_prefix("lb") {
                return Ok(Self::no_ball_leg_byes(count(n)?));
            }
            if let Some(n) = rest.strip_prefix('b') {
                return Ok(Self::no_ball_byes(count(n)?));
            }
            return Ok(Self::no_ball(count(rest)?));
        }
        if let Some(n) = input.strip_prefix("lb") {
            let runs = count(n)?;
            if runs == 0 {
                return Err(fail("leg byes need at least one run"));
            }
            return Ok(Self::leg_bye(runs));
        }
        if let Some(n) = input.strip_prefix('b') {
            let runs = count(n)?;
            if runs == 0 {
                return Err(fail("byes need at least one run"));
            }
            return Ok(Self::bye(runs));
        }
        Ok(Self::runs(count(&input)?))
    }
}
