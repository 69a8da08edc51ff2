use serde::Serialize;

use super::super::domain::{CandidateDraft, FieldId, Severity};
use super::catalog::RuleCatalog;
use super::config::GateConfig;
use super::EvaluationResult;

/// Reason a draft cannot be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum SubmissionBlocker {
    MissingValue(FieldId),
    StrictFailure(FieldId),
    ExceptionNotRequested(FieldId),
    RationaleRejected(FieldId),
}

impl SubmissionBlocker {
    pub fn field(&self) -> FieldId {
        match self {
            SubmissionBlocker::MissingValue(field)
            | SubmissionBlocker::StrictFailure(field)
            | SubmissionBlocker::ExceptionNotRequested(field)
            | SubmissionBlocker::RationaleRejected(field) => *field,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            SubmissionBlocker::MissingValue(field) => format!("{field} has no value"),
            SubmissionBlocker::StrictFailure(field) => {
                format!("{field} fails a strict rule and cannot be overridden")
            }
            SubmissionBlocker::ExceptionNotRequested(field) => {
                format!("{field} fails a soft rule without an exception request")
            }
            SubmissionBlocker::RationaleRejected(field) => {
                format!("{field} exception rationale is not acceptable")
            }
        }
    }
}

/// Full explanation of a gate decision.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GateAssessment {
    pub blockers: Vec<SubmissionBlocker>,
    /// Soft failures covered by an exception with an accepted rationale.
    pub overridden: Vec<FieldId>,
    /// Soft failures excused because the record is flagged for review.
    pub waived: Vec<FieldId>,
}

impl GateAssessment {
    pub fn is_submittable(&self) -> bool {
        self.blockers.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.blockers.is_empty() {
            return "ready to submit".to_string();
        }

        let reasons: Vec<String> = self.blockers.iter().map(SubmissionBlocker::summary).collect();
        format!("submission blocked: {}", reasons.join("; "))
    }
}

/// Aggregates evaluation results, exception requests, and rationales into a submit decision.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    catalog: &'static RuleCatalog,
    config: GateConfig,
}

impl SubmissionGate {
    pub fn new(catalog: &'static RuleCatalog, config: GateConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn is_rationale_acceptable(&self, text: &str) -> bool {
        self.config.rationale.is_acceptable(text)
    }

    pub fn can_submit(&self, record: &CandidateDraft, results: &[EvaluationResult]) -> bool {
        self.assess(record, results).is_submittable()
    }

    pub fn assess(&self, record: &CandidateDraft, results: &[EvaluationResult]) -> GateAssessment {
        let mut assessment = GateAssessment::default();

        for field in self.catalog.fields() {
            if record.value_of(field).is_empty() {
                assessment
                    .blockers
                    .push(SubmissionBlocker::MissingValue(field));
            }
        }

        let failing = results.iter().filter(|result| !result.valid);
        for result in failing {
            match self.catalog.severity_of(result.field) {
                Some(Severity::Strict) => assessment
                    .blockers
                    .push(SubmissionBlocker::StrictFailure(result.field)),
                Some(Severity::Soft) => self.account_soft_failure(record, result.field, &mut assessment),
                None => {}
            }
        }

        assessment
    }

    fn account_soft_failure(
        &self,
        record: &CandidateDraft,
        field: FieldId,
        assessment: &mut GateAssessment,
    ) {
        if record.flagged {
            assessment.waived.push(field);
            return;
        }

        match record.exceptions.rationale(field) {
            None => assessment
                .blockers
                .push(SubmissionBlocker::ExceptionNotRequested(field)),
            Some(rationale) if self.is_rationale_acceptable(rationale) => {
                assessment.overridden.push(field)
            }
            Some(_) => assessment
                .blockers
                .push(SubmissionBlocker::RationaleRejected(field)),
        }
    }

    /// Review flag stored on the assembled candidate.
    pub fn should_flag(&self, record: &CandidateDraft) -> bool {
        record.flagged || record.exceptions.len() > self.config.auto_flag_threshold
    }
}
