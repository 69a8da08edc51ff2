use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{CandidateDraft, FieldId, FieldValue, Severity};
use super::rules::admission_rules;

/// Inputs a predicate may read besides the value under test.
///
/// `record` is an immutable snapshot of the in-progress candidate so cross-field rules never
/// observe a half-applied edit; `today` anchors age calculations.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub record: &'a CandidateDraft,
    pub today: NaiveDate,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(record: &'a CandidateDraft, today: NaiveDate) -> Self {
        Self { record, today }
    }
}

/// Failed predicate. A violation without a message falls back to a generic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    message: Option<String>,
}

impl RuleViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unspecified() -> Self {
        Self { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Capability implemented by every field predicate. Implementations must be pure.
pub trait FieldValidator: Send + Sync {
    fn validate(
        &self,
        value: &FieldValue,
        context: &EvaluationContext<'_>,
    ) -> Result<(), RuleViolation>;
}

pub struct Rule {
    pub field: FieldId,
    pub label: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    validator: Box<dyn FieldValidator>,
}

impl Rule {
    pub fn new(
        field: FieldId,
        label: &'static str,
        severity: Severity,
        description: &'static str,
        validator: impl FieldValidator + 'static,
    ) -> Self {
        Self {
            field,
            label,
            severity,
            description,
            validator: Box::new(validator),
        }
    }

    pub fn check(
        &self,
        value: &FieldValue,
        context: &EvaluationContext<'_>,
    ) -> Result<(), RuleViolation> {
        self.validator.validate(value, context)
    }

    pub fn view(&self) -> RuleView {
        RuleView {
            field: self.field,
            label: self.label,
            severity: self.severity,
            description: self.description,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// Serializable description of a rule for clients rendering the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleView {
    pub field: FieldId,
    pub label: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

/// Ordered, read-only rule set. At most one rule per field.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

static ADMISSIONS: OnceLock<RuleCatalog> = OnceLock::new();

impl RuleCatalog {
    /// Build a catalog; a later rule for an already-covered field is dropped.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut ordered: Vec<Rule> = Vec::new();
        for rule in rules {
            if ordered.iter().all(|existing| existing.field != rule.field) {
                ordered.push(rule);
            }
        }
        Self { rules: ordered }
    }

    /// The process-wide admission rule set.
    pub fn admissions() -> &'static RuleCatalog {
        ADMISSIONS.get_or_init(|| RuleCatalog::new(admission_rules()))
    }

    pub fn rule(&self, field: FieldId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.field == field)
    }

    pub fn severity_of(&self, field: FieldId) -> Option<Severity> {
        self.rule(field).map(|rule| rule.severity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.rules.iter().map(|rule| rule.field)
    }

    pub fn views(&self) -> Vec<RuleView> {
        self.rules.iter().map(Rule::view).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
