use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::admissions::domain::{Candidate, CandidateDraft, CandidateId, FieldId, ScoreType};
use crate::admissions::ledger::ExceptionLedger;
use crate::admissions::repository::{CandidateStore, StoreError};
use crate::admissions::{admissions_router, AdmissionService};

pub(super) const ACCEPTED_RATIONALE: &str =
    "approved by admissions committee for early entry program";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Draft that passes every rule on [`today`].
pub(super) fn valid_draft() -> CandidateDraft {
    draft_with_birth(NaiveDate::from_ymd_opt(2000, 5, 15).expect("valid date"))
}

/// Draft that passes every rule on the wall-clock date, for handlers that read the clock.
pub(super) fn valid_draft_for_now() -> CandidateDraft {
    let now = chrono::Local::now().date_naive();
    draft_with_birth(NaiveDate::from_ymd_opt(now.year() - 25, 1, 1).expect("valid date"))
}

fn draft_with_birth(date_of_birth: NaiveDate) -> CandidateDraft {
    CandidateDraft {
        full_name: "Asha Verma".to_string(),
        email: "asha.verma@example.com".to_string(),
        phone: "9876543210".to_string(),
        date_of_birth: Some(date_of_birth),
        qualification: "B.Tech".to_string(),
        graduation_year: Some(2022),
        score_type: ScoreType::Percentage,
        score: Some(78.5),
        screening_score: Some(72),
        interview_status: "Cleared".to_string(),
        national_id: "123456789012".to_string(),
        offer_sent: "Yes".to_string(),
        exceptions: ExceptionLedger::new(),
        flagged: false,
    }
}

/// Seventeen on [`today`]; fails the soft age rule only.
pub(super) fn underage_draft() -> CandidateDraft {
    CandidateDraft {
        date_of_birth: NaiveDate::from_ymd_opt(2008, 1, 1),
        ..valid_draft()
    }
}

/// Fails three soft rules: age, graduation year, and screening score.
pub(super) fn three_soft_failures_draft() -> CandidateDraft {
    CandidateDraft {
        graduation_year: Some(2012),
        screening_score: Some(30),
        ..underage_draft()
    }
}

pub(super) fn with_rationales(mut draft: CandidateDraft, fields: &[FieldId]) -> CandidateDraft {
    for field in fields {
        draft.set_rationale(*field, ACCEPTED_RATIONALE);
    }
    draft
}

pub(super) fn stored_candidate(email: &str, submitted_at: DateTime<Utc>) -> Candidate {
    let draft = valid_draft();
    Candidate {
        id: CandidateId::generate(),
        full_name: draft.full_name,
        email: email.to_string(),
        phone: draft.phone,
        date_of_birth: NaiveDate::from_ymd_opt(2000, 5, 15).expect("valid date"),
        qualification: draft.qualification,
        graduation_year: 2022,
        score_type: ScoreType::Percentage,
        score: 78.5,
        screening_score: 72,
        interview_status: draft.interview_status,
        national_id: draft.national_id,
        offer_sent: draft.offer_sent,
        submitted_at,
        exceptions: ExceptionLedger::new(),
        flagged: false,
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    candidates: Mutex<Vec<Candidate>>,
}

impl MemoryStore {
    pub(super) fn with(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates: Mutex::new(candidates),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.candidates.lock().expect("lock").len()
    }
}

impl CandidateStore for MemoryStore {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, StoreError> {
        let mut guard = self.candidates.lock().expect("lock");
        if guard.iter().any(|existing| existing.id == candidate.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(candidate.clone());
        Ok(candidate)
    }

    fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates = self.candidates.lock().expect("lock").clone();
        candidates.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(candidates)
    }

    fn delete(&self, id: &CandidateId) -> Result<(), StoreError> {
        let mut guard = self.candidates.lock().expect("lock");
        let before = guard.len();
        guard.retain(|candidate| &candidate.id != id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Lists fine but refuses every write.
pub(super) struct UnavailableStore;

impl CandidateStore for UnavailableStore {
    fn insert(&self, _candidate: Candidate) -> Result<Candidate, StoreError> {
        Err(StoreError::Unavailable("database is locked".to_string()))
    }

    fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: &CandidateId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database is locked".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<AdmissionService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(AdmissionService::new(store.clone()));
    (service, store)
}

pub(super) fn router_with_service(service: Arc<AdmissionService<MemoryStore>>) -> axum::Router {
    admissions_router(service)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_error_response(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert!(body["error"].is_string(), "missing error payload: {body}");
    body
}
