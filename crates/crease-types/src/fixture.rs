use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::TeamId;

/// Playing format of a match. Selects the default [`MatchRules`](crate::MatchRules).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    T20,
    Odi,
    Test,
    Box,
    TheHundred,
    PairCricket,
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::T20 => "T20",
            Self::Odi => "ODI",
            Self::Test => "Test",
            Self::Box => "Box Cricket",
            Self::TheHundred => "The Hundred",
            Self::PairCricket => "Pair Cricket",
        };
        f.write_str(s)
    }
}

impl FromStr for MatchFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "t20" => Ok(Self::T20),
            "odi" => Ok(Self::Odi),
            "test" => Ok(Self::Test),
            "box" | "boxcricket" => Ok(Self::Box),
            "thehundred" | "hundred" => Ok(Self::TheHundred),
            "pair" | "paircricket" => Ok(Self::PairCricket),
            _ => Err(TypeError::UnknownVariant {
                kind: "match format",
                value: s.to_string(),
            }),
        }
    }
}

/// Lifecycle of a match: `Upcoming -> Live -> Completed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Upcoming => "Upcoming",
            Self::Live => "Live",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallType {
    Tennis,
    Leather,
    Vicky,
    Plastic,
    WindBall,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    Rough,
    Cement,
    Turf,
    AstroTurf,
    Matting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// Outcome of the toss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossResult {
    pub winner: TeamId,
    pub decision: TossDecision,
}

/// Fixture metadata carried alongside the scoring state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub format: MatchFormat,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub tournament_id: Option<String>,
    #[serde(default)]
    pub toss: Option<TossResult>,
    #[serde(default)]
    pub ball_type: Option<BallType>,
    #[serde(default)]
    pub pitch_type: Option<PitchType>,
}

impl MatchInfo {
    pub fn new(format: MatchFormat, venue: impl Into<String>) -> Self {
        Self {
            format,
            venue: venue.into(),
            date: None,
            title: None,
            season: None,
            tournament_id: None,
            toss: None,
            ball_type: None,
            pitch_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_loosely() {
        assert_eq!("t20".parse::<MatchFormat>().unwrap(), MatchFormat::T20);
        assert_eq!("The Hundred".parse::<MatchFormat>().unwrap(), MatchFormat::TheHundred);
        assert_eq!("box-cricket".parse::<MatchFormat>().unwrap(), MatchFormat::Box);
        assert!("baseball".parse::<MatchFormat>().is_err());
    }

    #[test]
    fn status_defaults_to_upcoming() {
        assert_eq!(MatchStatus::default(), MatchStatus::Upcoming);
    }

    #[test]
    fn info_deserializes_with_defaults() {
        let info: MatchInfo = serde_json::from_str(r#"{"format":"odi"}"#).unwrap();
        assert_eq!(info.format, MatchFormat::Odi);
        assert!(info.venue.is_empty());
        assert!(info.toss.is_none());
    }
}
