use crease_scoring::ScoringError;
use crease_store::StoreError;
use crease_types::MatchId;

/// Errors raised by a live scoring session.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    /// The action was rejected; the match state is unchanged.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A background save failed. The in-memory state is kept but was not
    /// confirmed durable.
    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("match not found: {0}")]
    NotFound(MatchId),
}

/// Result alias for live session operations.
pub type LiveResult<T> = Result<T, LiveError>;
