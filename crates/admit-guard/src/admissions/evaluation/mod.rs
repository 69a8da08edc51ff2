mod catalog;
mod config;
mod gate;
mod rationale;
mod rules;

pub use catalog::{EvaluationContext, FieldValidator, Rule, RuleCatalog, RuleView, RuleViolation};
pub use config::GateConfig;
pub use gate::{GateAssessment, SubmissionBlocker, SubmissionGate};
pub use rationale::{RationalePolicy, MIN_RATIONALE_LENGTH, RATIONALE_KEYWORDS};
pub use rules::{age_on, INTERVIEW_STATUSES, QUALIFICATIONS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CandidateDraft, FieldId, FieldValue, UnknownField};

pub const FALLBACK_MESSAGE: &str = "Invalid value";

/// Outcome of running one rule. Never stored; recomputed on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub field: FieldId,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EvaluationResult {
    fn passed(field: FieldId) -> Self {
        Self {
            field,
            valid: true,
            message: None,
        }
    }

    fn failed(field: FieldId, message: Option<&str>) -> Self {
        Self {
            field,
            valid: false,
            message: Some(message.unwrap_or(FALLBACK_MESSAGE).to_string()),
        }
    }
}

/// Caller errors; user input problems are reported through `EvaluationResult` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("no such field: {0}")]
    UnknownField(String),
}

impl From<UnknownField> for EvaluationError {
    fn from(value: UnknownField) -> Self {
        Self::UnknownField(value.0)
    }
}

/// Stateless evaluator that applies the catalog to candidate values.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator {
    catalog: &'static RuleCatalog,
}

impl FieldEvaluator {
    pub fn new(catalog: &'static RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static RuleCatalog {
        self.catalog
    }

    /// Evaluate `value` as the candidate value for `field`, with `record` as cross-field context.
    pub fn evaluate(
        &self,
        field: FieldId,
        value: &FieldValue,
        record: &CandidateDraft,
        today: NaiveDate,
    ) -> Result<EvaluationResult, EvaluationError> {
        let rule = self
            .catalog
            .rule(field)
            .ok_or_else(|| EvaluationError::UnknownField(field.to_string()))?;

        let context = EvaluationContext::new(record, today);
        Ok(match rule.check(value, &context) {
            Ok(()) => EvaluationResult::passed(field),
            Err(violation) => EvaluationResult::failed(field, violation.message()),
        })
    }

    /// Same as [`FieldEvaluator::evaluate`] for a field named on the wire.
    pub fn evaluate_named(
        &self,
        field: &str,
        value: &FieldValue,
        record: &CandidateDraft,
        today: NaiveDate,
    ) -> Result<EvaluationResult, EvaluationError> {
        let field: FieldId = field.parse()?;
        self.evaluate(field, value, record, today)
    }

    /// One result per catalog rule, in catalog order, using the record's own values.
    pub fn evaluate_all(&self, record: &CandidateDraft, today: NaiveDate) -> Vec<EvaluationResult> {
        let context = EvaluationContext::new(record, today);
        self.catalog
            .iter()
            .map(|rule| {
                let value = record.value_of(rule.field);
                match rule.check(&value, &context) {
                    Ok(()) => EvaluationResult::passed(rule.field),
                    Err(violation) => EvaluationResult::failed(rule.field, violation.message()),
                }
            })
            .collect()
    }
}
