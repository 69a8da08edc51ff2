use super::common::*;

use crate::admissions::domain::{CandidateDraft, FieldId};
use crate::admissions::evaluation::{
    FieldEvaluator, GateConfig, RuleCatalog, SubmissionBlocker, SubmissionGate,
};

fn gate() -> SubmissionGate {
    SubmissionGate::new(RuleCatalog::admissions(), GateConfig::default())
}

fn assess(draft: &CandidateDraft) -> crate::admissions::evaluation::GateAssessment {
    let results = FieldEvaluator::new(RuleCatalog::admissions()).evaluate_all(draft, today());
    gate().assess(draft, &results)
}

#[test]
fn valid_draft_is_submittable() {
    let assessment = assess(&valid_draft());
    assert!(assessment.is_submittable(), "{}", assessment.summary());
    assert!(assessment.overridden.is_empty());
}

#[test]
fn soft_failure_without_exception_blocks() {
    let assessment = assess(&underage_draft());
    assert_eq!(
        assessment.blockers,
        vec![SubmissionBlocker::ExceptionNotRequested(FieldId::DateOfBirth)]
    );
}

#[test]
fn empty_rationale_is_rejected() {
    let mut draft = underage_draft();
    draft.request_exception(FieldId::DateOfBirth);

    let assessment = assess(&draft);
    assert_eq!(
        assessment.blockers,
        vec![SubmissionBlocker::RationaleRejected(FieldId::DateOfBirth)]
    );
}

#[test]
fn accepted_rationale_overrides_soft_failure() {
    let mut draft = underage_draft();
    draft.request_exception(FieldId::DateOfBirth);
    draft.set_rationale(FieldId::DateOfBirth, ACCEPTED_RATIONALE);

    let assessment = assess(&draft);
    assert!(assessment.is_submittable(), "{}", assessment.summary());
    assert_eq!(assessment.overridden, vec![FieldId::DateOfBirth]);
}

#[test]
fn strict_failure_blocks_even_when_flagged() {
    let mut draft = CandidateDraft {
        interview_status: "Rejected".to_string(),
        offer_sent: "No".to_string(),
        flagged: true,
        ..valid_draft()
    };
    draft.set_rationale(FieldId::InterviewStatus, ACCEPTED_RATIONALE);

    let assessment = assess(&draft);
    assert!(!assessment.is_submittable());
    assert_eq!(
        assessment.blockers,
        vec![SubmissionBlocker::StrictFailure(FieldId::InterviewStatus)]
    );
}

#[test]
fn flag_waives_soft_failures() {
    let draft = CandidateDraft {
        flagged: true,
        ..three_soft_failures_draft()
    };

    let assessment = assess(&draft);
    assert!(assessment.is_submittable(), "{}", assessment.summary());
    assert_eq!(
        assessment.waived,
        vec![
            FieldId::DateOfBirth,
            FieldId::GraduationYear,
            FieldId::ScreeningScore,
        ]
    );
}

#[test]
fn missing_values_block_before_rules() {
    let draft = CandidateDraft {
        phone: String::new(),
        ..valid_draft()
    };

    let assessment = assess(&draft);
    assert!(assessment
        .blockers
        .contains(&SubmissionBlocker::MissingValue(FieldId::Phone)));
    assert!(assessment
        .blockers
        .contains(&SubmissionBlocker::StrictFailure(FieldId::Phone)));
}

#[test]
fn blank_form_cannot_be_submitted() {
    let draft = CandidateDraft::blank();
    let results = FieldEvaluator::new(RuleCatalog::admissions()).evaluate_all(&draft, today());
    assert!(!gate().can_submit(&draft, &results));
}

#[test]
fn more_than_two_exceptions_flag_the_record() {
    let gate = gate();
    let two = with_rationales(
        underage_draft(),
        &[FieldId::DateOfBirth, FieldId::GraduationYear],
    );
    assert!(!gate.should_flag(&two));

    let three = with_rationales(
        three_soft_failures_draft(),
        &[
            FieldId::DateOfBirth,
            FieldId::GraduationYear,
            FieldId::ScreeningScore,
        ],
    );
    assert!(gate.should_flag(&three));

    let manual = CandidateDraft {
        flagged: true,
        ..valid_draft()
    };
    assert!(gate.should_flag(&manual));
}

#[test]
fn threshold_is_configurable() {
    let config = GateConfig {
        auto_flag_threshold: 0,
        ..GateConfig::default()
    };
    let gate = SubmissionGate::new(RuleCatalog::admissions(), config);
    let draft = with_rationales(underage_draft(), &[FieldId::DateOfBirth]);
    assert!(gate.should_flag(&draft));
}
