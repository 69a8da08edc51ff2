use chrono::{DateTime, Utc};

use super::domain::{Candidate, CandidateDraft, CandidateId, FieldId};
use super::evaluation::SubmissionGate;

/// Raised when a draft cannot be turned into a stored candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("email {email} already exists in records")]
    DuplicateEmail { email: String },
    #[error("field {0} has no value")]
    MissingField(FieldId),
}

/// Stamps identity and submission time onto a gated draft.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    gate: SubmissionGate,
}

impl RecordAssembler {
    pub fn new(gate: SubmissionGate) -> Self {
        Self { gate }
    }

    /// Build the candidate that will be stored. The draft is left untouched on every path.
    ///
    /// `existing` is the current audit log; email uniqueness is checked against it here and
    /// not through the rule catalog.
    pub fn assemble(
        &self,
        draft: &CandidateDraft,
        existing: &[Candidate],
        submitted_at: DateTime<Utc>,
    ) -> Result<Candidate, AssemblyError> {
        let email = draft.email.trim();
        if existing
            .iter()
            .any(|candidate| candidate.email.trim().eq_ignore_ascii_case(email))
        {
            return Err(AssemblyError::DuplicateEmail {
                email: draft.email.clone(),
            });
        }

        let flagged = self.gate.should_flag(draft);

        Ok(Candidate {
            id: CandidateId::generate(),
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            date_of_birth: draft
                .date_of_birth
                .ok_or(AssemblyError::MissingField(FieldId::DateOfBirth))?,
            qualification: draft.qualification.clone(),
            graduation_year: draft
                .graduation_year
                .ok_or(AssemblyError::MissingField(FieldId::GraduationYear))?,
            score_type: draft.score_type,
            score: draft.score.ok_or(AssemblyError::MissingField(FieldId::Score))?,
            screening_score: draft
                .screening_score
                .ok_or(AssemblyError::MissingField(FieldId::ScreeningScore))?,
            interview_status: draft.interview_status.clone(),
            national_id: draft.national_id.clone(),
            offer_sent: draft.offer_sent.clone(),
            submitted_at,
            exceptions: draft.exceptions.clone(),
            flagged,
        })
    }
}
