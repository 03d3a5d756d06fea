//! Shared test fixtures: two eleven-player sides and a started innings.

use crease_types::{MatchRules, Player, PlayerRole, Team};

use crate::engine::InningsContext;
use crate::innings::InningsState;
use crate::replay::Opening;

fn side(prefix: &str, name: &str) -> Team {
    let mut team = Team::new(prefix, name, &name[..3].to_uppercase());
    for n in 1..=11 {
        let role = match n {
            1 => PlayerRole::WicketKeeper,
            2..=6 => PlayerRole::Batsman,
            7 | 8 => PlayerRole::AllRounder,
            _ => PlayerRole::Bowler,
        };
        team = team.with_player(Player::new(
            format!("{prefix}{n}").as_str(),
            format!("{name} {n}"),
            role,
        ));
    }
    team
}

pub fn teams() -> [Team; 2] {
    [side("a", "Alpha"), side("b", "Bravo")]
}

/// Twenty-over rules with a four-over bowling quota.
pub fn rules() -> MatchRules {
    MatchRules {
        overs_limit: Some(20),
        overs_per_bowler: Some(4),
        ..MatchRules::default()
    }
}

pub fn opening() -> Opening {
    Opening {
        striker: "a1".into(),
        non_striker: "a2".into(),
        bowler: "b11".into(),
    }
}

/// First innings of Alpha against Bravo with `a1`/`a2` opening to `b11`.
pub fn started(teams: &[Team; 2], rules: &MatchRules) -> InningsState {
    let mut innings = InningsState::new(1, teams[0].id.clone(), teams[1].id.clone(), None);
    let ctx = InningsContext::new(rules, teams, &teams[0].id).expect("context");
    innings.start(&ctx, opening()).expect("start");
    innings
}
