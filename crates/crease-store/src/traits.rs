use async_trait::async_trait;
use tokio::sync::broadcast;

use crease_scoring::MatchState;
use crease_types::{MatchId, Player, TeamId};

use crate::error::StoreResult;

/// Receiver of full-state replacements pushed by a store. Dropping it
/// unsubscribes.
pub type MatchStream = broadcast::Receiver<MatchState>;

/// Key-value persistence of match states.
///
/// Implementations must satisfy:
/// - `save` replaces whatever is stored for the match id (last write wins).
/// - `load` returns `Ok(None)` for an unknown id, `Err` only on I/O or
///   decoding failure.
/// - A successful `save` is visible to the next `load` on the same store.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn load(&self, id: &MatchId) -> StoreResult<Option<MatchState>>;

    async fn save(&self, state: &MatchState) -> StoreResult<()>;

    /// Ids of every stored match, sorted.
    async fn list(&self) -> StoreResult<Vec<MatchId>>;

    /// Subscribe to replacements of one match.
    fn subscribe(&self, id: &MatchId) -> MatchStream;
}

/// Source of the players each team can field.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// The team's players in batting order.
    async fn eligible_players(&self, team: &TeamId) -> StoreResult<Vec<Player>>;
}
