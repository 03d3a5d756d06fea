use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crease_scoring::{ActionOutcome, MatchState, ScoreboardSnapshot, ScoringAction, ScoringMessage};
use crease_store::{MatchRepository, MatchStream};
use crease_types::MatchId;

use crate::config::LiveConfig;
use crate::error::{LiveError, LiveResult};

/// A live scoring session over one match.
///
/// Scoring methods are synchronous but spawn their save onto the current
/// tokio runtime, so they must be called from within one.
pub struct LiveMatch {
    state: MatchState,
    repo: Arc<dyn MatchRepository>,
    snapshots: broadcast::Sender<ScoreboardSnapshot>,
    pending: Vec<JoinHandle<()>>,
    /// First save failure not yet reported by `flush`.
    failure: Arc<Mutex<Option<String>>>,
    /// Sequence number of the latest spawned save.
    write_seq: u64,
    /// Sequence number of the latest completed save. A save older than it
    /// is dropped so the newest state is the one left in the store.
    last_written: Arc<Mutex<u64>>,
    /// Fingerprints of states this session saved, oldest first.
    own_writes: VecDeque<String>,
    echo_window: usize,
}

impl LiveMatch {
    /// Wrap a state without saving it.
    pub fn new(state: MatchState, repo: Arc<dyn MatchRepository>, config: LiveConfig) -> Self {
        let (snapshots, _) = broadcast::channel(config.snapshot_capacity);
        Self {
            state,
            repo,
            snapshots,
            pending: Vec::new(),
            failure: Arc::new(Mutex::new(None)),
            write_seq: 0,
            last_written: Arc::new(Mutex::new(0)),
            own_writes: VecDeque::new(),
            echo_window: config.echo_window,
        }
    }

    /// Start a session on a new match, saving it before returning.
    pub async fn create(
        state: MatchState,
        repo: Arc<dyn MatchRepository>,
        config: LiveConfig,
    ) -> LiveResult<Self> {
        repo.save(&state).await?;
        info!(match_id = %state.id, "Match created");
        let mut live = Self::new(state, repo, config);
        live.remember_write();
        Ok(live)
    }

    /// Resume a stored match.
    pub async fn open(
        id: &MatchId,
        repo: Arc<dyn MatchRepository>,
        config: LiveConfig,
    ) -> LiveResult<Self> {
        let state = repo
            .load(id)
            .await?
            .ok_or_else(|| LiveError::NotFound(id.clone()))?;
        debug!(match_id = %id, revision = state.revision, "Match opened");
        Ok(Self::new(state, repo, config))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot(&self) -> ScoreboardSnapshot {
        self.state.snapshot()
    }

    /// Receive a snapshot after every applied message.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreboardSnapshot> {
        self.snapshots.subscribe()
    }

    /// Subscribe to replacements of this match pushed by the store.
    pub fn watch(&self) -> MatchStream {
        self.repo.subscribe(&self.state.id)
    }

    /// Apply a message, then persist in the background and publish a
    /// snapshot. On error nothing changes and nothing is saved.
    ///
    /// External replacements are taken as-is and not written back.
    pub fn apply(&mut self, message: ScoringMessage) -> LiveResult<ActionOutcome> {
        let resets = matches!(message, ScoringMessage::Local(ScoringAction::ResetInnings));
        let outcome = self.state.dispatch(message)?;
        if resets {
            self.abort_pending();
        }
        if !outcome.replaced {
            self.persist();
        }
        if outcome.innings_completed {
            info!(match_id = %self.state.id, "Innings completed");
        }
        // No viewers is not an error.
        let _ = self.snapshots.send(self.state.snapshot());
        Ok(outcome)
    }

    /// Apply a local scoring action.
    pub fn act(&mut self, action: ScoringAction) -> LiveResult<ActionOutcome> {
        self.apply(ScoringMessage::Local(action))
    }

    /// Discard the current innings. Saves still in flight are aborted.
    pub fn reset_innings(&mut self) -> LiveResult<ActionOutcome> {
        self.act(ScoringAction::ResetInnings)
    }

    /// Apply every replacement waiting on `stream` without blocking.
    ///
    /// The store is last-writer-wins: any state another session saved
    /// replaces the local one, whatever its revision. Replacements for
    /// other matches, echoes of this session's own saves, and states
    /// identical to the local one are skipped. Returns the number applied.
    pub fn sync_from(&mut self, stream: &mut MatchStream) -> LiveResult<usize> {
        let mut applied = 0;
        loop {
            let incoming = match stream.try_recv() {
                Ok(state) => state,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(match_id = %self.state.id, missed, "Replacement stream lagged");
                    continue;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            };
            if incoming.id != self.state.id {
                continue;
            }
            let fingerprint = incoming.fingerprint()?;
            if let Some(pos) = self.own_writes.iter().position(|f| *f == fingerprint) {
                // Echoes arrive in save order, so older ones are done too.
                self.own_writes.drain(..=pos);
                continue;
            }
            if fingerprint == self.state.fingerprint()? {
                continue;
            }
            debug!(
                match_id = %self.state.id,
                revision = incoming.revision,
                "Applying external replacement"
            );
            self.apply(ScoringMessage::ExternalReplace(Box::new(incoming)))?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Number of background saves that have not finished.
    pub fn pending_writes(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every background save and report the first failure since
    /// the previous flush.
    pub async fn flush(&mut self) -> LiveResult<()> {
        let handles: Vec<_> = self.pending.drain(..).collect();
        for handle in handles {
            match handle.await {
                Err(err) if !err.is_cancelled() => {
                    warn!(match_id = %self.state.id, error = %err, "Save task failed");
                    self.failure.lock().await.get_or_insert(err.to_string());
                }
                _ => {}
            }
        }
        match self.failure.lock().await.take() {
            Some(failure) => Err(LiveError::Persistence(failure)),
            None => Ok(()),
        }
    }

    fn persist(&mut self) {
        // Finished saves have already recorded any failure.
        self.pending.retain(|h| !h.is_finished());
        self.remember_write();
        self.write_seq += 1;
        let seq = self.write_seq;
        let state = self.state.clone();
        let repo = Arc::clone(&self.repo);
        let last_written = Arc::clone(&self.last_written);
        let failure = Arc::clone(&self.failure);
        self.pending.push(tokio::spawn(async move {
            let mut last = last_written.lock().await;
            if *last > seq {
                return;
            }
            match repo.save(&state).await {
                Ok(()) => *last = seq,
                Err(err) => {
                    warn!(match_id = %state.id, revision = state.revision, error = %err, "Save failed");
                    failure.lock().await.get_or_insert(err.to_string());
                }
            }
        }));
    }

    fn remember_write(&mut self) {
        match self.state.fingerprint() {
            Ok(fingerprint) => {
                if self.own_writes.len() >= self.echo_window {
                    self.own_writes.pop_front();
                }
                self.own_writes.push_back(fingerprint);
            }
            Err(err) => warn!(match_id = %self.state.id, error = %err, "Cannot fingerprint state"),
        }
    }

    fn abort_pending(&mut self) {
        let aborted = self.pending_writes();
        for handle in &self.pending {
            handle.abort();
        }
        if aborted > 0 {
            debug!(match_id = %self.state.id, aborted, "Aborted pending saves");
        }
    }
}
