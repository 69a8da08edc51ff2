use super::domain::{Candidate, CandidateId};

/// Persistence collaborator for accepted candidates.
pub trait CandidateStore: Send + Sync {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, StoreError>;
    /// All stored candidates, most recently submitted first.
    fn list(&self) -> Result<Vec<Candidate>, StoreError>;
    fn delete(&self, id: &CandidateId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}
