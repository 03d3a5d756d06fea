use serde::{Deserialize, Serialize};

use crease_types::PlayerId;

/// Which end a batsman occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum End {
    Striker,
    NonStriker,
}

/// Whether striker and non-striker change ends after a delivery.
///
/// Odd runs physically run swap the batsmen; completing the over swaps them
/// again, so an odd run off the last ball leaves the striker facing.
pub fn should_swap(runs_run: u32, over_completed: bool) -> bool {
    (runs_run % 2 == 1) != over_completed
}

/// Players currently in the middle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crease {
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
}

impl Crease {
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    pub fn end_of(&self, player: &PlayerId) -> Option<End> {
        if self.striker.as_ref() == Some(player) {
            Some(End::Striker)
        } else if self.non_striker.as_ref() == Some(player) {
            Some(End::NonStriker)
        } else {
            None
        }
    }

    pub fn batsman_at(&self, end: End) -> Option<&PlayerId> {
        match end {
            End::Striker => self.striker.as_ref(),
            End::NonStriker => self.non_striker.as_ref(),
        }
    }

    pub(crate) fn set_end(&mut self, end: End, player: Option<PlayerId>) {
        match end {
            End::Striker => self.striker = player,
            End::NonStriker => self.non_striker = player,
        }
    }

    pub fn is_batting(&self, player: &PlayerId) -> bool {
        self.end_of(player).is_some()
    }
}
