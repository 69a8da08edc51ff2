use super::common::*;

use crate::admissions::domain::FieldId;
use crate::admissions::evaluation::RationalePolicy;
use crate::admissions::ledger::{ExceptionLedger, RationaleUpdate};

#[test]
fn requesting_twice_restores_the_ledger() {
    let mut draft = valid_draft();
    draft.set_rationale(FieldId::Score, ACCEPTED_RATIONALE);
    let before = draft.exceptions.clone();

    assert!(draft.request_exception(FieldId::DateOfBirth));
    assert_eq!(draft.exceptions.rationale(FieldId::DateOfBirth), Some(""));
    assert!(!draft.request_exception(FieldId::DateOfBirth));

    assert_eq!(draft.exceptions, before);
}

#[test]
fn toggling_withdraws_an_exception_with_a_rationale() {
    let mut ledger = ExceptionLedger::new();
    ledger.set_rationale(FieldId::GraduationYear, ACCEPTED_RATIONALE);

    assert!(!ledger.toggle(FieldId::GraduationYear));
    assert!(!ledger.is_open(FieldId::GraduationYear));
}

#[test]
fn rationale_without_request_opens_the_exception() {
    let mut ledger = ExceptionLedger::new();
    assert_eq!(
        ledger.set_rationale(FieldId::ScreeningScore, "waiver granted"),
        RationaleUpdate::Opened
    );
    assert_eq!(
        ledger.set_rationale(FieldId::ScreeningScore, ACCEPTED_RATIONALE),
        RationaleUpdate::Updated
    );
    assert_eq!(
        ledger.rationale(FieldId::ScreeningScore),
        Some(ACCEPTED_RATIONALE)
    );
    assert_eq!(ledger.len(), 1);
}

#[test]
fn ledger_serializes_as_field_to_rationale_map() {
    let ledger: ExceptionLedger = [(FieldId::DateOfBirth, "special case".to_string())]
        .into_iter()
        .collect();
    let json = serde_json::to_value(&ledger).expect("serialize ledger");
    assert_eq!(json, serde_json::json!({ "date_of_birth": "special case" }));

    let parsed: ExceptionLedger = serde_json::from_value(json).expect("deserialize ledger");
    assert_eq!(parsed, ledger);
}

#[test]
fn rationale_needs_length_and_keyword() {
    let policy = RationalePolicy::default();

    assert!(policy.is_acceptable(ACCEPTED_RATIONALE));
    assert!(policy.is_acceptable("Documentation Pending from the university"));
    assert!(!policy.is_acceptable("approved by dean"));
    assert!(!policy.is_acceptable(
        "candidate showed strong potential in the interview round"
    ));
}

#[test]
fn rationale_length_counts_characters() {
    let policy = RationalePolicy::default();
    // "special case" plus padding to exactly thirty characters.
    let exact = format!("special case{}", "x".repeat(18));
    assert_eq!(exact.chars().count(), 30);
    assert!(policy.is_acceptable(&exact));
    assert!(!policy.is_acceptable(&exact[..29]));
}

#[test]
fn custom_policy_matches_keywords_case_insensitively() {
    let policy = RationalePolicy::new(10, ["Board Exemption"]);
    assert!(policy.is_acceptable("per BOARD EXEMPTION 42"));
    assert!(!policy.is_acceptable("approved by the dean"));
}
