use admit_guard::admissions::{
    Candidate, CandidateId, CandidateStore, SqliteCandidateStore, StoreError,
};
use admit_guard::config::StorageConfig;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_store(config: &StorageConfig) -> Result<SqliteCandidateStore, StoreError> {
    let store = if config.is_in_memory() {
        SqliteCandidateStore::open_in_memory()?
    } else {
        SqliteCandidateStore::open(&config.database_path)?
    };
    info!(path = %config.database_path.display(), "candidate audit log opened");
    Ok(store)
}

/// Volatile audit log used by the demo command.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateStore {
    candidates: Arc<Mutex<Vec<Candidate>>>,
}

impl InMemoryCandidateStore {
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<Candidate>>, StoreError> {
        self.candidates
            .lock()
            .map_err(|_| StoreError::Unavailable("candidate mutex poisoned".to_string()))
    }
}

impl CandidateStore for InMemoryCandidateStore {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, StoreError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|existing| existing.id == candidate.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(candidate.clone());
        Ok(candidate)
    }

    fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates = self.guard()?.clone();
        candidates.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(candidates)
    }

    fn delete(&self, id: &CandidateId) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        let before = guard.len();
        guard.retain(|candidate| &candidate.id != id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
