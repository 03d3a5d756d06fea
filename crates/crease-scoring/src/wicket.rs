//! Dismissals: validation against the crease and roster, scorecard text,
//! and the replacement batsman.

use crease_types::{DismissalKind, Extra, PlayerId, Team, Wicket};

use crate::engine::InningsContext;
use crate::error::{ScoringError, ScoringResult};
use crate::innings::InningsState;
use crate::ledger::{BattingEntry, DismissalRecord};
use crate::strike::End;

/// A wicket that has passed validation and can be applied without failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WicketPlan {
    pub kind: DismissalKind,
    pub player_out: PlayerId,
    pub end: End,
    /// `None` when the innings is all out.
    pub incoming: Option<PlayerId>,
}

impl WicketPlan {
    pub fn all_out(&self) -> bool {
        self.incoming.is_none()
    }
}

/// Scorecard text for a dismissal.
pub fn dismissal_text(kind: &DismissalKind, bowler: &PlayerId, bowling: &Team) -> String {
    let bowler_name = bowling.player_name(bowler);
    match kind {
        DismissalKind::Bowled => format!("b {bowler_name}"),
        DismissalKind::Caught { fielder } if fielder == bowler => format!("c & b {bowler_name}"),
        DismissalKind::Caught { fielder } => {
            format!("c {} b {bowler_name}", bowling.player_name(fielder))
        }
        DismissalKind::Lbw => format!("lbw b {bowler_name}"),
        DismissalKind::Stumped { keeper } => {
            format!("st {} b {bowler_name}", bowling.player_name(keeper))
        }
        DismissalKind::RunOut { fielder: Some(f) } => {
            format!("run out ({})", bowling.player_name(f))
        }
        DismissalKind::RunOut { fielder: None } => "run out".to_string(),
        DismissalKind::HitWicket => format!("hit wicket b {bowler_name}"),
        DismissalKind::ObstructingField => "obstructing the field".to_string(),
        DismissalKind::RetiredOut => "retired out".to_string(),
    }
}

/// Batting-side players who can still come in, in roster order.
pub fn eligible_replacements<'t>(innings: &InningsState, batting: &'t Team) -> Vec<&'t PlayerId> {
    batting
        .players
        .iter()
        .map(|p| &p.id)
        .filter(|id| !innings.has_batted(id) && !innings.crease.is_batting(id))
        .collect()
}

fn fielder_of(kind: &DismissalKind) -> Option<&PlayerId> {
    match kind {
        DismissalKind::Caught { fielder } => Some(fielder),
        DismissalKind::Stumped { keeper } => Some(keeper),
        DismissalKind::RunOut { fielder } => fielder.as_ref(),
        _ => None,
    }
}

/// Check a wicket against the current crease and rosters. Nothing is
/// mutated; the returned plan is applied by [`apply_wicket`].
pub(crate) fn plan_wicket(
    innings: &InningsState,
    ctx: &InningsContext<'_>,
    wicket: &Wicket,
    extra: Extra,
) -> ScoringResult<WicketPlan> {
    if !wicket.kind.allowed_on(extra) {
        return Err(ScoringError::InvalidDelivery(format!(
            "{} is not possible on {extra:?}",
            wicket.kind.name()
        )));
    }

    let player_out = match (&wicket.player_out, &innings.crease.striker) {
        (Some(p), _) => p.clone(),
        (None, Some(striker)) => striker.clone(),
        (None, None) => {
            return Err(ScoringError::InvalidDelivery("no striker to dismiss".into()));
        }
    };
    let end = innings.crease.end_of(&player_out).ok_or_else(|| {
        ScoringError::InvalidDelivery(format!("{player_out} is not at the crease"))
    })?;
    if end == End::NonStriker && !wicket.kind.can_dismiss_non_striker() {
        return Err(ScoringError::InvalidDelivery(format!(
            "the non-striker cannot be out {}",
            wicket.kind.name()
        )));
    }

    if let Some(fielder) = fielder_of(&wicket.kind) {
        if !ctx.bowling.contains(fielder) {
            return Err(ScoringError::UnknownPlayer {
                player: fielder.clone(),
                team: ctx.bowling.id.clone(),
            });
        }
    }

    let wickets = innings.total_wickets + 1;
    if wickets > ctx.rules.wickets_limit {
        return Err(ScoringError::InvalidDelivery(format!(
            "wicket {wickets} exceeds the limit of {}",
            ctx.rules.wickets_limit
        )));
    }

    let remaining = eligible_replacements(innings, ctx.batting);
    let incoming = if wickets == ctx.rules.wickets_limit || remaining.is_empty() {
        None
    } else {
        let incoming = wicket.incoming.as_ref().ok_or_else(|| {
            ScoringError::InvalidDelivery("a replacement batsman is required".into())
        })?;
        if !ctx.batting.contains(incoming) {
            return Err(ScoringError::UnknownPlayer {
                player: incoming.clone(),
                team: ctx.batting.id.clone(),
            });
        }
        if !remaining.contains(&incoming) {
            return Err(ScoringError::InvalidDelivery(format!(
                "{incoming} has already batted"
            )));
        }
        Some(incoming.clone())
    };

    Ok(WicketPlan {
        kind: wicket.kind.clone(),
        player_out,
        end,
        incoming,
    })
}

/// Dismiss the outgoing batsman, credit the bowler and bring in the
/// replacement at the vacated end.
pub(crate) fn apply_wicket(
    innings: &mut InningsState,
    ctx: &InningsContext<'_>,
    plan: WicketPlan,
    bowler: &PlayerId,
) {
    let text = dismissal_text(&plan.kind, bowler, ctx.bowling);
    if plan.kind.credited_to_bowler() {
        if let Some(entry) = innings.bowling_entry_mut(bowler) {
            entry.wickets += 1;
        }
    }
    if let Some(entry) = innings.batting_entry_mut(&plan.player_out) {
        entry.dismiss(DismissalRecord {
            kind: plan.kind,
            bowler: bowler.clone(),
            text,
        });
    }
    innings.total_wickets += 1;

    if let Some(incoming) = &plan.incoming {
        innings
            .batting
            .push(BattingEntry::new(incoming.clone(), ctx.batting.player_name(incoming)));
    }
    innings.crease.set_end(plan.end, plan.incoming);
}
