use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::{ExceptionLedger, RationaleUpdate};

/// Opaque identifier assigned to a candidate when it is accepted into the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracked intake fields, one per catalog rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    DateOfBirth,
    Qualification,
    GraduationYear,
    Score,
    ScreeningScore,
    InterviewStatus,
    NationalId,
    OfferSent,
}

impl FieldId {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::FullName,
            Self::Email,
            Self::Phone,
            Self::DateOfBirth,
            Self::Qualification,
            Self::GraduationYear,
            Self::Score,
            Self::ScreeningScore,
            Self::InterviewStatus,
            Self::NationalId,
            Self::OfferSent,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::DateOfBirth => "date_of_birth",
            Self::Qualification => "qualification",
            Self::GraduationYear => "graduation_year",
            Self::Score => "score",
            Self::ScreeningScore => "screening_score",
            Self::InterviewStatus => "interview_status",
            Self::NationalId => "national_id",
            Self::OfferSent => "offer_sent",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no such field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FieldId {
    type Err = UnknownField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|field| field.as_str() == needle)
            .ok_or_else(|| UnknownField(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Failure blocks submission; no override exists.
    Strict,
    /// Failure can be overridden by an accepted rationale or waived by flagging.
    Soft,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strict => "STRICT",
            Self::Soft => "SOFT",
        }
    }
}

/// How the applicant reported their academic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreType {
    #[default]
    Percentage,
    #[serde(rename = "CGPA")]
    Cgpa,
}

impl ScoreType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percentage => "Percentage",
            Self::Cgpa => "CGPA",
        }
    }
}

/// Tagged value handed to a rule predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    /// Selection from a fixed list (qualification, interview status, offer sent).
    Choice(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) | FieldValue::Choice(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Choice(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(value) => Some(*value),
            FieldValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Choice(_) => "choice",
            FieldValue::Integer(_) => "integer",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Date(_) => "date",
            FieldValue::Empty => "empty",
        }
    }
}

fn text_value(raw: &str, choice: bool) -> FieldValue {
    match (raw.is_empty(), choice) {
        (true, _) => FieldValue::Empty,
        (false, true) => FieldValue::Choice(raw.to_string()),
        (false, false) => FieldValue::Text(raw.to_string()),
    }
}

/// Raised when an edit carries a value of the wrong kind for the field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("field {field} expects a {expected} value, got {found}")]
    TypeMismatch {
        field: FieldId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("graduation year {0} is out of range")]
    YearOutOfRange(i64),
    #[error("screening score {0} is out of range")]
    ScoreOutOfRange(i64),
}

/// Candidate record while it is still being edited. Every tracked field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub qualification: String,
    pub graduation_year: Option<i32>,
    pub score_type: ScoreType,
    pub score: Option<f64>,
    pub screening_score: Option<i32>,
    pub interview_status: String,
    pub national_id: String,
    pub offer_sent: String,
    pub exceptions: ExceptionLedger,
    pub flagged: bool,
}

impl CandidateDraft {
    /// Blank intake form with the defaults the form opens with.
    pub fn blank() -> Self {
        Self {
            graduation_year: Some(2024),
            score: Some(0.0),
            screening_score: Some(0),
            offer_sent: "No".to_string(),
            ..Self::default()
        }
    }

    /// Snapshot of the current value of `field` as a rule input.
    pub fn value_of(&self, field: FieldId) -> FieldValue {
        match field {
            FieldId::FullName => text_value(&self.full_name, false),
            FieldId::Email => text_value(&self.email, false),
            FieldId::Phone => text_value(&self.phone, false),
            FieldId::DateOfBirth => self
                .date_of_birth
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Empty),
            FieldId::Qualification => text_value(&self.qualification, true),
            FieldId::GraduationYear => self
                .graduation_year
                .map(|year| FieldValue::Integer(i64::from(year)))
                .unwrap_or(FieldValue::Empty),
            FieldId::Score => self
                .score
                .map(FieldValue::Decimal)
                .unwrap_or(FieldValue::Empty),
            FieldId::ScreeningScore => self
                .screening_score
                .map(|score| FieldValue::Integer(i64::from(score)))
                .unwrap_or(FieldValue::Empty),
            FieldId::InterviewStatus => text_value(&self.interview_status, true),
            FieldId::NationalId => text_value(&self.national_id, false),
            FieldId::OfferSent => text_value(&self.offer_sent, true),
        }
    }

    /// Store `value` into `field`. `FieldValue::Empty` clears the field.
    pub fn set_field(&mut self, field: FieldId, value: FieldValue) -> Result<(), DraftError> {
        let mismatch = |expected: &'static str, value: &FieldValue| DraftError::TypeMismatch {
            field,
            expected,
            found: value.kind(),
        };

        match field {
            FieldId::FullName
            | FieldId::Email
            | FieldId::Phone
            | FieldId::Qualification
            | FieldId::InterviewStatus
            | FieldId::NationalId
            | FieldId::OfferSent => {
                let text = match &value {
                    FieldValue::Empty => String::new(),
                    other => other
                        .as_str()
                        .ok_or_else(|| mismatch("text", other))?
                        .to_string(),
                };
                if let Some(slot) = self.text_slot(field) {
                    *slot = text;
                }
            }
            FieldId::DateOfBirth => {
                self.date_of_birth = match &value {
                    FieldValue::Empty => None,
                    other => Some(other.as_date().ok_or_else(|| mismatch("date", other))?),
                };
            }
            FieldId::GraduationYear => {
                self.graduation_year = match &value {
                    FieldValue::Empty => None,
                    other => {
                        let year = other.as_integer().ok_or_else(|| mismatch("integer", other))?;
                        Some(i32::try_from(year).map_err(|_| DraftError::YearOutOfRange(year))?)
                    }
                };
            }
            FieldId::Score => {
                self.score = match &value {
                    FieldValue::Empty => None,
                    other => Some(other.as_decimal().ok_or_else(|| mismatch("decimal", other))?),
                };
            }
            FieldId::ScreeningScore => {
                self.screening_score = match &value {
                    FieldValue::Empty => None,
                    other => {
                        let score = other.as_integer().ok_or_else(|| mismatch("integer", other))?;
                        Some(i32::try_from(score).map_err(|_| DraftError::ScoreOutOfRange(score))?)
                    }
                };
            }
        }

        Ok(())
    }

    fn text_slot(&mut self, field: FieldId) -> Option<&mut String> {
        match field {
            FieldId::FullName => Some(&mut self.full_name),
            FieldId::Email => Some(&mut self.email),
            FieldId::Phone => Some(&mut self.phone),
            FieldId::Qualification => Some(&mut self.qualification),
            FieldId::InterviewStatus => Some(&mut self.interview_status),
            FieldId::NationalId => Some(&mut self.national_id),
            FieldId::OfferSent => Some(&mut self.offer_sent),
            FieldId::DateOfBirth
            | FieldId::GraduationYear
            | FieldId::Score
            | FieldId::ScreeningScore => None,
        }
    }

    /// Toggle an exception request for `field`.
    pub fn request_exception(&mut self, field: FieldId) -> bool {
        self.exceptions.toggle(field)
    }

    pub fn set_rationale(&mut self, field: FieldId, text: impl Into<String>) -> RationaleUpdate {
        self.exceptions.set_rationale(field, text)
    }
}

/// Candidate accepted into the audit log. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub qualification: String,
    pub graduation_year: i32,
    pub score_type: ScoreType,
    pub score: f64,
    pub screening_score: i32,
    pub interview_status: String,
    pub national_id: String,
    pub offer_sent: String,
    pub submitted_at: DateTime<Utc>,
    pub exceptions: ExceptionLedger,
    pub flagged: bool,
}

impl Candidate {
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}
