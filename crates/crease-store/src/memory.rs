use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crease_scoring::MatchState;
use crease_types::MatchId;

use crate::error::StoreResult;
use crate::traits::{MatchRepository, MatchStream};

/// Default capacity of per-subscriber broadcast channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Subscriber watching one match.
struct Subscriber {
    match_id: MatchId,
    sender: broadcast::Sender<MatchState>,
}

/// Fans saved states out to the subscribers of their match.
struct SubscriberRouter {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl SubscriberRouter {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    fn subscribe(&self, match_id: &MatchId, capacity: usize) -> MatchStream {
        let (tx, rx) = broadcast::channel(capacity);
        self.subscribers
            .write()
            .expect("router lock poisoned")
            .push(Subscriber {
                match_id: match_id.clone(),
                sender: tx,
            });
        rx
    }

    /// Subscribers whose receivers are all dropped are pruned.
    fn route(&self, state: &MatchState) {
        let mut subs = self.subscribers.write().expect("router lock poisoned");
        subs.retain(|sub| {
            if sub.match_id == state.id {
                sub.sender.send(state.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("router lock poisoned").len()
    }
}

/// In-memory, HashMap-based match store.
///
/// Every save is pushed to the match's subscribers, so two sessions sharing
/// one store observe each other's writes as external replacements.
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, MatchState>>,
    router: SubscriberRouter,
    capacity: usize,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a store whose subscriber channels buffer `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: RwLock::new(HashMap::new()),
            router: SubscriberRouter::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.read().expect("lock poisoned").is_empty()
    }

    /// Number of live subscriptions across all matches.
    pub fn subscriber_count(&self) -> usize {
        self.router.subscriber_count()
    }
}

impl Default for InMemoryMatchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchStore {
    async fn load(&self, id: &MatchId) -> StoreResult<Option<MatchState>> {
        Ok(self.matches.read().expect("lock poisoned").get(id).cloned())
    }

    async fn save(&self, state: &MatchState) -> StoreResult<()> {
        self.matches
            .write()
            .expect("lock poisoned")
            .insert(state.id.clone(), state.clone());
        debug!(match_id = %state.id, revision = state.revision, "Match saved");
        self.router.route(state);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<MatchId>> {
        let mut ids: Vec<MatchId> = self
            .matches
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn subscribe(&self, id: &MatchId) -> MatchStream {
        self.router.subscribe(id, self.capacity)
    }
}
