use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crease_scoring::MatchState;
use crease_types::MatchId;

use crate::error::{StoreError, StoreResult};
use crate::traits::{MatchRepository, MatchStream};

const EXTENSION: &str = "json";

/// On-disk envelope around a saved match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub saved_at: DateTime<Utc>,
    /// Content fingerprint of `state` at save time.
    pub fingerprint: String,
    pub state: MatchState,
}

/// Directory-backed store: one pretty-printed JSON document per match.
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// never observes a partial document. Nothing pushes replacements into a
/// directory, so subscriptions stay silent.
pub struct FileMatchStore {
    dir: PathBuf,
    idle: broadcast::Sender<MatchState>,
}

impl FileMatchStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "Opened match store");
        let (idle, _) = broadcast::channel(1);
        Ok(Self { dir, idle })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &MatchId) -> StoreResult<PathBuf> {
        let key = id.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    /// Load the full envelope, including save time and fingerprint.
    pub async fn load_envelope(&self, id: &MatchId) -> StoreResult<Option<StoredMatch>> {
        let path = self.path_for(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl MatchRepository for FileMatchStore {
    async fn load(&self, id: &MatchId) -> StoreResult<Option<MatchState>> {
        Ok(self.load_envelope(id).await?.map(|stored| stored.state))
    }

    async fn save(&self, state: &MatchState) -> StoreResult<()> {
        let path = self.path_for(&state.id)?;
        let fingerprint = state
            .fingerprint()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let envelope = StoredMatch {
            saved_at: Utc::now(),
            fingerprint,
            state: state.clone(),
        };
        let json = serde_json::to_vec_pretty(&envelope)?;

        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(
            match_id = %state.id,
            revision = state.revision,
            bytes = json.len(),
            "Match written"
        );
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<MatchId>> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(MatchId::from(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn subscribe(&self, _id: &MatchId) -> MatchStream {
        self.idle.subscribe()
    }
}
