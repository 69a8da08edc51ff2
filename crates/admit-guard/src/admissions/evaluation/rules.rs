use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::super::domain::{FieldId, FieldValue, Severity};
use super::catalog::{EvaluationContext, FieldValidator, Rule, RuleViolation};

pub const QUALIFICATIONS: [&str; 8] = [
    "B.Tech", "B.E.", "B.Sc", "BCA", "M.Tech", "M.Sc", "MCA", "MBA",
];

pub const INTERVIEW_STATUSES: [&str; 3] = ["Cleared", "Waitlisted", "Rejected"];

const OFFER_ELIGIBLE_STATUSES: [&str; 2] = ["Cleared", "Waitlisted"];

const MIN_AGE: i32 = 18;
const MAX_AGE: i32 = 35;
const EARLIEST_GRADUATION: i64 = 2015;
const LATEST_GRADUATION: i64 = 2025;
const MIN_PERCENTAGE: f64 = 60.0;
const MIN_CGPA: f64 = 6.0;
const MIN_SCREENING_SCORE: i64 = 40;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone pattern compiles"));

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("national id pattern compiles"));

/// The fixed admission rule set, in form order.
pub(crate) fn admission_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            FieldId::FullName,
            "Full Name",
            Severity::Strict,
            "Min 2 characters. No numbers. First & Last name must be capitalized.",
            FullNameRule,
        ),
        Rule::new(
            FieldId::Email,
            "Email",
            Severity::Strict,
            "Valid email format. Must be unique.",
            PatternRule {
                pattern: &EMAIL_RE,
                message: "Invalid email format.",
            },
        ),
        Rule::new(
            FieldId::Phone,
            "Phone",
            Severity::Strict,
            "10-digit Indian mobile number (starts with 6/7/8/9).",
            PatternRule {
                pattern: &PHONE_RE,
                message: "Must be 10 digits starting with 6, 7, 8, or 9.",
            },
        ),
        Rule::new(
            FieldId::DateOfBirth,
            "Date of Birth",
            Severity::Soft,
            "Candidate must be ≥ 18 and ≤ 35 years old.",
            AgeWindowRule,
        ),
        Rule::new(
            FieldId::Qualification,
            "Highest Qualification",
            Severity::Strict,
            "Must be one of the approved degrees.",
            OneOfRule {
                allowed: &QUALIFICATIONS,
                message: "Invalid qualification.",
            },
        ),
        Rule::new(
            FieldId::GraduationYear,
            "Graduation Year",
            Severity::Soft,
            "Must be between 2015 and 2025.",
            GraduationYearRule,
        ),
        Rule::new(
            FieldId::Score,
            "Percentage / CGPA",
            Severity::Soft,
            "Percentage ≥ 60% or CGPA ≥ 6.0.",
            AcademicScoreRule,
        ),
        Rule::new(
            FieldId::ScreeningScore,
            "Screening Test Score",
            Severity::Soft,
            "Must be ≥ 40 out of 100.",
            ScreeningScoreRule,
        ),
        Rule::new(
            FieldId::InterviewStatus,
            "Interview Status",
            Severity::Strict,
            "Must be Cleared, Waitlisted, or Rejected.",
            InterviewStatusRule,
        ),
        Rule::new(
            FieldId::NationalId,
            "Aadhaar Number",
            Severity::Strict,
            "Exactly 12 digits. No alphabets.",
            PatternRule {
                pattern: &NATIONAL_ID_RE,
                message: "Must be exactly 12 digits.",
            },
        ),
        Rule::new(
            FieldId::OfferSent,
            "Offer Letter Sent",
            Severity::Strict,
            "Cannot be 'Yes' unless Interview Status is 'Cleared' or 'Waitlisted'.",
            OfferSentRule,
        ),
    ]
}

fn text_of(value: &FieldValue) -> Result<&str, RuleViolation> {
    match value {
        FieldValue::Empty => Ok(""),
        other => other.as_str().ok_or_else(RuleViolation::unspecified),
    }
}

struct FullNameRule;

impl FieldValidator for FullNameRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let raw = text_of(value)?;
        let trimmed = raw.trim();

        if trimmed.chars().count() < 2 {
            return Err(RuleViolation::new("Min 2 characters required."));
        }
        if raw.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(RuleViolation::new("Numbers are not allowed."));
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();
        if words.len() < 2 {
            return Err(RuleViolation::new(
                "Please enter both First and Last name.",
            ));
        }

        let capitalized = words
            .iter()
            .all(|word| word.chars().next().is_some_and(char::is_uppercase));
        if !capitalized {
            return Err(RuleViolation::new(
                "First letter of each name must be capitalized (e.g. John Doe).",
            ));
        }

        Ok(())
    }
}

struct PatternRule {
    pattern: &'static LazyLock<Regex>,
    message: &'static str,
}

impl FieldValidator for PatternRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let raw = text_of(value)?;
        if self.pattern.is_match(raw) {
            Ok(())
        } else {
            Err(RuleViolation::new(self.message))
        }
    }
}

struct OneOfRule {
    allowed: &'static [&'static str],
    message: &'static str,
}

impl FieldValidator for OneOfRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let raw = text_of(value)?;
        if self.allowed.contains(&raw) {
            Ok(())
        } else {
            Err(RuleViolation::new(self.message))
        }
    }
}

/// Whole years between `birth` and `today`; a birthday not yet reached this year does not count.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

struct AgeWindowRule;

impl FieldValidator for AgeWindowRule {
    fn validate(
        &self,
        value: &FieldValue,
        context: &EvaluationContext<'_>,
    ) -> Result<(), RuleViolation> {
        let birth = match value {
            FieldValue::Empty => return Err(RuleViolation::new("DOB is required.")),
            other => other.as_date().ok_or_else(RuleViolation::unspecified)?,
        };

        let age = age_on(birth, context.today);
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(RuleViolation::new(format!(
                "Age is {age}, must be {MIN_AGE}-{MAX_AGE}."
            )));
        }

        Ok(())
    }
}

struct GraduationYearRule;

impl FieldValidator for GraduationYearRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let year = match value {
            FieldValue::Empty => return Err(RuleViolation::new("Graduation Year is required.")),
            other => other.as_integer().ok_or_else(RuleViolation::unspecified)?,
        };

        if !(EARLIEST_GRADUATION..=LATEST_GRADUATION).contains(&year) {
            return Err(RuleViolation::new(format!(
                "Year must be {EARLIEST_GRADUATION}-{LATEST_GRADUATION}."
            )));
        }

        Ok(())
    }
}

struct AcademicScoreRule;

impl FieldValidator for AcademicScoreRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let score = match value {
            FieldValue::Empty => return Err(RuleViolation::new("Percentage / CGPA is required.")),
            other => other.as_decimal().ok_or_else(RuleViolation::unspecified)?,
        };

        // Anything above the CGPA scale is read as a percentage.
        if score > 10.0 {
            if score < MIN_PERCENTAGE {
                return Err(RuleViolation::new("Percentage must be ≥ 60%."));
            }
        } else if score < MIN_CGPA {
            return Err(RuleViolation::new("CGPA must be ≥ 6.0."));
        }

        Ok(())
    }
}

struct ScreeningScoreRule;

impl FieldValidator for ScreeningScoreRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let score = match value {
            FieldValue::Empty => {
                return Err(RuleViolation::new("Screening Test Score is required."))
            }
            other => other.as_integer().ok_or_else(RuleViolation::unspecified)?,
        };

        if score < MIN_SCREENING_SCORE {
            return Err(RuleViolation::new(format!(
                "Score must be ≥ {MIN_SCREENING_SCORE}."
            )));
        }

        Ok(())
    }
}

struct InterviewStatusRule;

impl FieldValidator for InterviewStatusRule {
    fn validate(&self, value: &FieldValue, _: &EvaluationContext<'_>) -> Result<(), RuleViolation> {
        let status = text_of(value)?;
        if !INTERVIEW_STATUSES.contains(&status) {
            return Err(RuleViolation::new("Invalid status."));
        }
        if status == "Rejected" {
            return Err(RuleViolation::new(
                "Rejected candidates cannot be submitted.",
            ));
        }
        Ok(())
    }
}

struct OfferSentRule;

impl FieldValidator for OfferSentRule {
    fn validate(
        &self,
        value: &FieldValue,
        context: &EvaluationContext<'_>,
    ) -> Result<(), RuleViolation> {
        let offer = text_of(value)?;
        let status = context.record.interview_status.as_str();
        if offer == "Yes" && !OFFER_ELIGIBLE_STATUSES.contains(&status) {
            return Err(RuleViolation::new(
                "Cannot send offer unless status is Cleared/Waitlisted.",
            ));
        }
        Ok(())
    }
}
