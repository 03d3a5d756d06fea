use crease_types::TeamId;

/// Errors from match persistence and roster lookups.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The roster provider does not know the team.
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    /// The match id cannot be used as a storage key.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
