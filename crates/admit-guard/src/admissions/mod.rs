//! Candidate admission intake: rule evaluation, exception gating, and the audit log.
//!
//! Drafts are evaluated field by field against the admission rule catalog. Strict rule
//! failures always block submission; soft failures can be overridden with an exception
//! request carrying an acceptable rationale, or waived by flagging the draft for review.
//! Accepted drafts are assembled into immutable candidates and handed to a
//! [`CandidateStore`].

pub(crate) mod assembler;
pub mod domain;
pub mod evaluation;
pub mod export;
pub mod ledger;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateDraft, CandidateId, DraftError, FieldId, FieldValue, ScoreType, Severity,
    UnknownField,
};
pub use evaluation::{
    EvaluationError, EvaluationResult, FieldEvaluator, GateAssessment, GateConfig,
    RationalePolicy, RuleCatalog, RuleView, SubmissionBlocker, SubmissionGate,
};
pub use export::{ExportError, CSV_HEADERS};
pub use ledger::{ExceptionLedger, RationaleUpdate};
pub use repository::{CandidateStore, StoreError};
pub use router::admissions_router;
pub use service::{AdmissionService, AdmissionServiceError};
pub use sqlite::SqliteCandidateStore;
pub use summary::DashboardSummary;
