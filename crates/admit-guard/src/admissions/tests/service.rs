use super::common::*;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

use crate::admissions::domain::{CandidateDraft, CandidateId, DraftError, FieldId, FieldValue};
use crate::admissions::repository::{CandidateStore, StoreError};
use crate::admissions::{AdmissionService, AdmissionServiceError, SubmissionBlocker};

#[test]
fn submit_persists_assembled_candidate() {
    let (service, store) = build_service();

    let candidate = service
        .submit_at(&valid_draft(), submitted_at(), today())
        .expect("valid draft submits");

    assert_eq!(candidate.submitted_at, submitted_at());
    assert_eq!(candidate.email, "asha.verma@example.com");
    assert!(!candidate.flagged);
    assert_eq!(store.len(), 1);
    assert_eq!(service.candidates().expect("list")[0].id, candidate.id);
}

#[test]
fn three_exceptions_flag_the_stored_candidate() {
    let (service, _) = build_service();
    let draft = with_rationales(
        three_soft_failures_draft(),
        &[
            FieldId::DateOfBirth,
            FieldId::GraduationYear,
            FieldId::ScreeningScore,
        ],
    );
    assert!(!draft.flagged);

    let candidate = service
        .submit_at(&draft, submitted_at(), today())
        .expect("overridden draft submits");

    assert!(candidate.flagged);
    assert_eq!(candidate.exception_count(), 3);
}

#[test]
fn underage_candidate_submits_with_accepted_rationale() {
    let (service, _) = build_service();
    let mut draft = underage_draft();

    assert!(!service.can_submit(&draft, today()));
    service.request_exception(&mut draft, FieldId::DateOfBirth);
    service.set_rationale(&mut draft, FieldId::DateOfBirth, ACCEPTED_RATIONALE);
    assert!(service.can_submit(&draft, today()));

    let candidate = service
        .submit_at(&draft, submitted_at(), today())
        .expect("submits with override");
    assert_eq!(
        candidate.exceptions.rationale(FieldId::DateOfBirth),
        Some(ACCEPTED_RATIONALE)
    );
    assert!(!candidate.flagged);
}

#[test]
fn duplicate_email_is_refused_without_touching_the_draft() {
    let existing = stored_candidate("Asha.Verma@example.com", submitted_at());
    let store = Arc::new(MemoryStore::with(vec![existing]));
    let service = AdmissionService::new(store.clone());

    let draft = valid_draft();
    let snapshot = draft.clone();

    match service.submit_at(&draft, submitted_at(), today()) {
        Err(AdmissionServiceError::DuplicateEmail { email }) => {
            assert_eq!(email, "asha.verma@example.com")
        }
        other => panic!("expected duplicate email, got {other:?}"),
    }

    assert_eq!(draft, snapshot);
    assert_eq!(store.len(), 1);
}

#[test]
fn refused_submission_explains_blockers() {
    let (service, store) = build_service();
    let draft = CandidateDraft {
        interview_status: "Rejected".to_string(),
        offer_sent: "No".to_string(),
        ..valid_draft()
    };

    match service.submit_at(&draft, submitted_at(), today()) {
        Err(AdmissionServiceError::NotSubmittable(assessment)) => assert_eq!(
            assessment.blockers,
            vec![SubmissionBlocker::StrictFailure(FieldId::InterviewStatus)]
        ),
        other => panic!("expected refusal, got {other:?}"),
    }
    assert_eq!(store.len(), 0);
}

#[test]
fn store_failures_propagate() {
    let service = AdmissionService::new(Arc::new(UnavailableStore));

    match service.submit_at(&valid_draft(), submitted_at(), today()) {
        Err(AdmissionServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[test]
fn correcting_edit_clears_the_exception() {
    let (service, _) = build_service();
    let mut draft = with_rationales(underage_draft(), &[FieldId::DateOfBirth]);

    let still_young = NaiveDate::from_ymd_opt(2008, 3, 1).expect("valid date");
    let result = service
        .apply_edit(
            &mut draft,
            FieldId::DateOfBirth,
            FieldValue::Date(still_young),
            today(),
        )
        .expect("edit applies");
    assert!(!result.valid);
    assert!(draft.exceptions.is_open(FieldId::DateOfBirth));

    let adult = NaiveDate::from_ymd_opt(2001, 3, 1).expect("valid date");
    let result = service
        .apply_edit(&mut draft, FieldId::DateOfBirth, FieldValue::Date(adult), today())
        .expect("edit applies");
    assert!(result.valid);
    assert!(!draft.exceptions.is_open(FieldId::DateOfBirth));
    assert_eq!(draft.date_of_birth, Some(adult));
}

#[test]
fn edit_with_wrong_value_kind_is_rejected() {
    let (service, _) = build_service();
    let mut draft = valid_draft();

    match service.apply_edit(
        &mut draft,
        FieldId::ScreeningScore,
        FieldValue::Text("high".to_string()),
        today(),
    ) {
        Err(AdmissionServiceError::Draft(DraftError::TypeMismatch { field, .. })) => {
            assert_eq!(field, FieldId::ScreeningScore)
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    assert_eq!(draft.screening_score, Some(72));
}

#[test]
fn offer_is_reevaluated_against_the_edited_status() {
    let (service, _) = build_service();
    let mut draft = valid_draft();

    service
        .apply_edit(
            &mut draft,
            FieldId::InterviewStatus,
            FieldValue::Empty,
            today(),
        )
        .expect("edit applies");

    let offer = service
        .evaluate_named("offer_sent", &draft, today())
        .expect("catalogued");
    assert!(!offer.valid);
}

#[test]
fn list_is_most_recent_first() {
    let older = stored_candidate("older@example.com", submitted_at() - Duration::days(2));
    let newer = stored_candidate("newer@example.com", submitted_at());
    let service = AdmissionService::new(Arc::new(MemoryStore::with(vec![older, newer])));

    let emails: Vec<String> = service
        .candidates()
        .expect("list")
        .into_iter()
        .map(|candidate| candidate.email)
        .collect();
    assert_eq!(emails, vec!["newer@example.com", "older@example.com"]);
}

#[test]
fn delete_reports_unknown_ids() {
    let (service, store) = build_service();
    let candidate = service
        .submit_at(&valid_draft(), submitted_at(), today())
        .expect("submits");

    service.delete(&candidate.id).expect("delete succeeds");
    assert_eq!(store.len(), 0);

    match service.delete(&candidate.id) {
        Err(AdmissionServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn summary_counts_exceptions_and_flags() {
    let mut with_exception = stored_candidate("one@example.com", submitted_at());
    with_exception
        .exceptions
        .set_rationale(FieldId::Score, ACCEPTED_RATIONALE);
    let mut flagged = stored_candidate("two@example.com", submitted_at());
    flagged.flagged = true;
    let plain = stored_candidate("three@example.com", submitted_at());

    let store = MemoryStore::with(vec![with_exception, flagged, plain]);
    let service = AdmissionService::new(Arc::new(store));

    let summary = service.summary().expect("summary");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.with_exceptions, 1);
    assert_eq!(summary.flagged, 1);
    assert_eq!(summary.exception_rate, 33.3);
}

#[test]
fn empty_log_has_zero_exception_rate() {
    let (service, _) = build_service();
    let summary = service.summary().expect("summary");
    assert_eq!(summary.total, 0);
    assert_eq!(summary.exception_rate, 0.0);
}

#[test]
fn csv_export_keeps_identifiers_as_text() {
    let (service, _) = build_service();
    service
        .submit_at(&valid_draft(), submitted_at(), today())
        .expect("submits");

    let csv = service.export_csv().expect("csv export");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Full Name,Email,Phone,DOB,Qualification,Grad Year,Score,Test Score,\
             Interview Status,Aadhaar,Offer Sent,Exceptions Count,Timestamp"
        )
    );
    let row = lines.next().expect("one data row");
    assert!(row.starts_with("Asha Verma,asha.verma@example.com,"));
    assert!(row.contains("\t9876543210"));
    assert!(row.contains("\t123456789012"));
    assert!(row.contains("2000-05-15"));
    assert!(lines.next().is_none());
}

#[test]
fn json_export_round_trips_candidates() {
    let (service, store) = build_service();
    service
        .submit_at(&valid_draft(), submitted_at(), today())
        .expect("submits");

    let json = service.export_json().expect("json export");
    let parsed: Vec<crate::admissions::Candidate> =
        serde_json::from_str(&json).expect("parse export");
    assert_eq!(parsed, store.list().expect("list"));
}

#[test]
fn retried_submission_gets_a_fresh_identity() {
    let (service, _) = build_service();
    let first = service
        .submit_at(&valid_draft(), submitted_at(), today())
        .expect("submits");

    let second_draft = CandidateDraft {
        email: "second@example.com".to_string(),
        ..valid_draft()
    };
    let second = service
        .submit_at(&second_draft, submitted_at(), today())
        .expect("submits");

    assert_ne!(first.id, second.id);
    assert_ne!(second.id, CandidateId(String::new()));
}
