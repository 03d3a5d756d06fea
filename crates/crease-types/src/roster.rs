use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{PlayerId, TeamId};

/// Primary skill of a player on the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Batsman => "Batsman",
            Self::Bowler => "Bowler",
            Self::AllRounder => "All-Rounder",
            Self::WicketKeeper => "Wicket Keeper",
        };
        f.write_str(s)
    }
}

/// A player as listed on a team roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: PlayerRole,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

/// A team with its ordered playing roster.
///
/// Roster order is the batting order used for the did-not-bat list and for
/// offering replacement batsmen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_name: short_name.into(),
            players: Vec::new(),
        }
    }

    /// Builder-style roster append.
    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Display name of a player, falling back to the raw id.
    pub fn player_name(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
