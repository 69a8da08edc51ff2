use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, warn};

use super::assembler::{AssemblyError, RecordAssembler};
use super::domain::{Candidate, CandidateDraft, CandidateId, DraftError, FieldId, FieldValue};
use super::evaluation::{
    EvaluationError, EvaluationResult, FieldEvaluator, GateAssessment, GateConfig, RuleCatalog,
    SubmissionGate,
};
use super::export::{self, ExportError};
use super::ledger::RationaleUpdate;
use super::repository::{CandidateStore, StoreError};
use super::summary::DashboardSummary;

/// Service composing the rule catalog, submission gate, and candidate store.
pub struct AdmissionService<S> {
    store: Arc<S>,
    evaluator: FieldEvaluator,
    gate: SubmissionGate,
    assembler: RecordAssembler,
}

impl<S> AdmissionService<S>
where
    S: CandidateStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, GateConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: GateConfig) -> Self {
        let catalog = RuleCatalog::admissions();
        let gate = SubmissionGate::new(catalog, config);

        Self {
            store,
            evaluator: FieldEvaluator::new(catalog),
            assembler: RecordAssembler::new(gate.clone()),
            gate,
        }
    }

    pub fn catalog(&self) -> &'static RuleCatalog {
        self.evaluator.catalog()
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    pub fn evaluate_field(
        &self,
        field: FieldId,
        value: &FieldValue,
        record: &CandidateDraft,
        today: NaiveDate,
    ) -> Result<EvaluationResult, EvaluationError> {
        self.evaluator.evaluate(field, value, record, today)
    }

    /// Evaluate the record's current value for a field named on the wire.
    pub fn evaluate_named(
        &self,
        field: &str,
        record: &CandidateDraft,
        today: NaiveDate,
    ) -> Result<EvaluationResult, EvaluationError> {
        let field: FieldId = field.parse()?;
        self.evaluator
            .evaluate(field, &record.value_of(field), record, today)
    }

    pub fn evaluate_record(&self, record: &CandidateDraft, today: NaiveDate) -> Vec<EvaluationResult> {
        self.evaluator.evaluate_all(record, today)
    }

    /// Store `value`, evaluate it against the updated record, and drop the field's
    /// exception entry once the value passes.
    pub fn apply_edit(
        &self,
        record: &mut CandidateDraft,
        field: FieldId,
        value: FieldValue,
        today: NaiveDate,
    ) -> Result<EvaluationResult, AdmissionServiceError> {
        record.set_field(field, value)?;
        let result = self
            .evaluator
            .evaluate(field, &record.value_of(field), record, today)?;

        if result.valid && record.exceptions.clear(field).is_some() {
            info!(field = %field, "exception cleared after correcting edit");
        }
        Ok(result)
    }

    pub fn request_exception(&self, record: &mut CandidateDraft, field: FieldId) -> bool {
        record.request_exception(field)
    }

    pub fn set_rationale(
        &self,
        record: &mut CandidateDraft,
        field: FieldId,
        text: impl Into<String>,
    ) -> RationaleUpdate {
        record.set_rationale(field, text)
    }

    pub fn assess(&self, record: &CandidateDraft, today: NaiveDate) -> GateAssessment {
        let results = self.evaluator.evaluate_all(record, today);
        self.gate.assess(record, &results)
    }

    pub fn can_submit(&self, record: &CandidateDraft, today: NaiveDate) -> bool {
        self.assess(record, today).is_submittable()
    }

    /// Submit using the wall clock for both the age check and the timestamp.
    pub fn submit(&self, draft: &CandidateDraft) -> Result<Candidate, AdmissionServiceError> {
        self.submit_at(draft, Utc::now(), Local::now().date_naive())
    }

    /// Gate, assemble, and persist a draft. The draft itself is never modified.
    pub fn submit_at(
        &self,
        draft: &CandidateDraft,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Candidate, AdmissionServiceError> {
        let assessment = self.assess(draft, today);
        if !assessment.is_submittable() {
            warn!(
                blockers = assessment.blockers.len(),
                reason = %assessment.summary(),
                "submission refused"
            );
            return Err(AdmissionServiceError::NotSubmittable(assessment));
        }

        let existing = self.store.list()?;
        let candidate = self
            .assembler
            .assemble(draft, &existing, now)
            .map_err(|err| {
                warn!(error = %err, "submission rejected during assembly");
                AdmissionServiceError::from(err)
            })?;

        let stored = self.store.insert(candidate).map_err(|err| {
            warn!(error = %err, "candidate persist failed");
            err
        })?;

        info!(
            candidate_id = %stored.id,
            exceptions = stored.exception_count(),
            flagged = stored.flagged,
            "candidate submitted"
        );
        Ok(stored)
    }

    pub fn candidates(&self) -> Result<Vec<Candidate>, AdmissionServiceError> {
        Ok(self.store.list()?)
    }

    pub fn delete(&self, id: &CandidateId) -> Result<(), AdmissionServiceError> {
        self.store.delete(id)?;
        info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }

    pub fn summary(&self) -> Result<DashboardSummary, AdmissionServiceError> {
        let candidates = self.store.list()?;
        Ok(DashboardSummary::from_candidates(&candidates))
    }

    pub fn export_csv(&self) -> Result<String, AdmissionServiceError> {
        let candidates = self.store.list()?;
        Ok(export::to_csv(&candidates)?)
    }

    pub fn export_json(&self) -> Result<String, AdmissionServiceError> {
        let candidates = self.store.list()?;
        Ok(export::to_json(&candidates)?)
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error("{}", .0.summary())]
    NotSubmittable(GateAssessment),
    #[error("email {email} already exists in records")]
    DuplicateEmail { email: String },
    #[error("draft is incomplete: {0} has no value")]
    Incomplete(FieldId),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<AssemblyError> for AdmissionServiceError {
    fn from(value: AssemblyError) -> Self {
        match value {
            AssemblyError::DuplicateEmail { email } => Self::DuplicateEmail { email },
            AssemblyError::MissingField(field) => Self::Incomplete(field),
        }
    }
}
