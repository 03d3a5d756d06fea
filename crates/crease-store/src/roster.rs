use async_trait::async_trait;

use crease_scoring::MatchState;
use crease_types::{Player, Team, TeamId};

use crate::error::{StoreError, StoreResult};
use crate::traits::RosterProvider;

/// Roster provider serving the two teams embedded in a match.
#[derive(Clone, Debug)]
pub struct MatchRoster {
    teams: [Team; 2],
}

impl MatchRoster {
    pub fn new(teams: [Team; 2]) -> Self {
        Self { teams }
    }

    pub fn from_state(state: &MatchState) -> Self {
        Self::new(state.teams.clone())
    }
}

#[async_trait]
impl RosterProvider for MatchRoster {
    async fn eligible_players(&self, team: &TeamId) -> StoreResult<Vec<Player>> {
        self.teams
            .iter()
            .find(|t| &t.id == team)
            .map(|t| t.players.clone())
            .ok_or_else(|| StoreError::UnknownTeam(team.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crease_types::PlayerRole;

    use super::*;

    fn roster() -> MatchRoster {
        MatchRoster::new([
            Team::new("thd", "Thunder", "THD")
                .with_player(Player::new("t1", "Sarath", PlayerRole::Batsman))
                .with_player(Player::new("t2", "Ravi", PlayerRole::Bowler)),
            Team::new("str", "Strikers", "STR")
                .with_player(Player::new("s1", "Seetharam", PlayerRole::AllRounder)),
        ])
    }

    #[tokio::test]
    async fn players_in_batting_order() {
        let players = roster().eligible_players(&"thd".into()).await.unwrap();
        let ids: Vec<&str> = players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn unknown_team() {
        let err = roster().eligible_players(&"xyz".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownTeam(_)));
    }
}
