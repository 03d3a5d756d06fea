//! Append-only innings event log, deterministic replay and undo.
//!
//! The log is the source of truth for an innings: replaying it from the
//! opening crease through the reducer reproduces every derived figure.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crease_types::{Delivery, PlayerId};

use crate::engine::InningsContext;
use crate::error::{ScoringError, ScoringResult};
use crate::innings::InningsState;

/// Openers and opening bowler confirmed when the innings began.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub striker: PlayerId,
    pub non_striker: PlayerId,
    pub bowler: PlayerId,
}

/// A delivery stamped with the crease it was bowled to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedDelivery {
    pub delivery: Delivery,
    pub striker: PlayerId,
    pub non_striker: PlayerId,
    pub bowler: PlayerId,
}

/// One accepted action in an innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum InningsEvent {
    Delivery(RecordedDelivery),
    BowlerSelected { bowler: PlayerId },
    StrikeSwapped,
    Closed,
}

impl InningsState {
    /// Rebuild this innings from scratch by replaying its log.
    pub fn replay(&self, ctx: &InningsContext<'_>) -> ScoringResult<InningsState> {
        replay_events(self, ctx, &self.log)
    }

    /// Remove the last delivery, together with any crease actions recorded
    /// after it, and rebuild the innings. Returns the removed delivery.
    pub fn undo_last(&mut self, ctx: &InningsContext<'_>) -> ScoringResult<Delivery> {
        let (idx, removed) = self
            .log
            .iter()
            .enumerate()
            .rev()
            .find_map(|(idx, event)| match event {
                InningsEvent::Delivery(recorded) => Some((idx, recorded.delivery.clone())),
                _ => None,
            })
            .ok_or_else(|| ScoringError::InvalidAction("no delivery to undo".into()))?;
        let rebuilt = replay_events(self, ctx, &self.log[..idx])?;
        debug!(
            innings = self.number,
            ball = %removed,
            score = %rebuilt.score(),
            "Delivery undone"
        );
        *self = rebuilt;
        Ok(removed)
    }
}

fn replay_events(
    base: &InningsState,
    ctx: &InningsContext<'_>,
    events: &[InningsEvent],
) -> ScoringResult<InningsState> {
    let opening = base.opening.clone().ok_or(ScoringError::InningsNotStarted)?;
    let mut innings = InningsState::new(
        base.number,
        base.batting_team.clone(),
        base.bowling_team.clone(),
        base.target,
    );
    innings.start(ctx, opening)?;

    for (n, event) in events.iter().enumerate() {
        match event {
            InningsEvent::Delivery(recorded) => {
                let crease = &innings.crease;
                if crease.striker.as_ref() != Some(&recorded.striker)
                    || crease.non_striker.as_ref() != Some(&recorded.non_striker)
                    || crease.bowler.as_ref() != Some(&recorded.bowler)
                {
                    return Err(ScoringError::InvalidAction(format!(
                        "event {n} was recorded against a different crease"
                    )));
                }
                innings.apply_delivery(ctx, &recorded.delivery)?;
            }
            InningsEvent::BowlerSelected { bowler } => innings.select_bowler(ctx, bowler)?,
            InningsEvent::StrikeSwapped => innings.swap_strike()?,
            InningsEvent::Closed => innings.close()?,
        }
    }
    Ok(innings)
}
