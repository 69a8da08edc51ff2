use crate::infra::InMemoryCandidateStore;
use admit_guard::admissions::{
    AdmissionService, CandidateDraft, EvaluationResult, ExceptionLedger, FieldId, FieldValue,
    ScoreType,
};
use admit_guard::error::AppError;
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Args;
use std::sync::Arc;

const DEMO_RATIONALE: &str = "approved by admissions committee for early entry program";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date used for age checks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the exported audit log as JSON after the scenarios run.
    #[arg(long)]
    pub(crate) show_export: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, show_export } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("AdmitGuard intake demo (evaluated as of {today})");
    let store = Arc::new(InMemoryCandidateStore::default());
    let service = AdmissionService::new(store);

    println!("\nSingle-token name");
    let draft = demo_draft(today, "a.sharma@example.com");
    let result = service.evaluate_field(
        FieldId::FullName,
        &FieldValue::Text("john".to_string()),
        &draft,
        today,
    )?;
    print_result(&result);

    println!("\nUnderage candidate with an approved exception");
    let mut draft = demo_draft(today, "b.nair@example.com");
    let result = service.apply_edit(
        &mut draft,
        FieldId::DateOfBirth,
        FieldValue::Date(years_before(today, 17)),
        today,
    )?;
    print_result(&result);
    println!("  submittable before exception: {}", service.can_submit(&draft, today));
    service.request_exception(&mut draft, FieldId::DateOfBirth);
    service.set_rationale(&mut draft, FieldId::DateOfBirth, DEMO_RATIONALE);
    println!("  submittable after exception: {}", service.can_submit(&draft, today));
    match service.submit_at(&draft, Utc::now(), today) {
        Ok(candidate) => println!(
            "  stored {} with {} exception(s), flagged={}",
            candidate.id,
            candidate.exception_count(),
            candidate.flagged
        ),
        Err(err) => println!("  submission refused: {err}"),
    }

    println!("\nPercentage versus CGPA scale");
    let draft = demo_draft(today, "c.iyer@example.com");
    for score in [65.0, 5.5] {
        let result = service.evaluate_field(
            FieldId::Score,
            &FieldValue::Decimal(score),
            &draft,
            today,
        )?;
        print!("  {score}: ");
        print_result(&result);
    }

    println!("\nRejected interview status");
    let draft = CandidateDraft {
        interview_status: "Rejected".to_string(),
        offer_sent: "No".to_string(),
        flagged: true,
        ..demo_draft(today, "d.khan@example.com")
    };
    let assessment = service.assess(&draft, today);
    println!("  {}", assessment.summary());

    println!("\nOffer letter depends on interview status");
    for status in ["Waitlisted", ""] {
        let draft = CandidateDraft {
            interview_status: status.to_string(),
            ..demo_draft(today, "e.das@example.com")
        };
        let result = service.evaluate_named(FieldId::OfferSent.as_str(), &draft, today)?;
        print!("  offer=Yes status={status:?}: ");
        print_result(&result);
    }

    println!("\nAuto-flag: three overridden soft rules");
    let mut draft = CandidateDraft {
        date_of_birth: Some(years_before(today, 17)),
        graduation_year: Some(2012),
        screening_score: Some(30),
        ..demo_draft(today, "f.menon@example.com")
    };
    for field in [
        FieldId::DateOfBirth,
        FieldId::GraduationYear,
        FieldId::ScreeningScore,
    ] {
        service.set_rationale(&mut draft, field, DEMO_RATIONALE);
    }
    match service.submit_at(&draft, Utc::now(), today) {
        Ok(candidate) => println!(
            "  stored {} flagged={} (user flag was {})",
            candidate.id, candidate.flagged, draft.flagged
        ),
        Err(err) => println!("  submission refused: {err}"),
    }

    let summary = service.summary()?;
    println!(
        "\nAudit log: {} candidates | {} with exceptions | {} flagged | {:.1}% exception rate",
        summary.total, summary.with_exceptions, summary.flagged, summary.exception_rate
    );

    if show_export {
        println!("{}", service.export_json()?);
    }

    Ok(())
}

fn print_result(result: &EvaluationResult) {
    match &result.message {
        Some(message) if !result.valid => println!("{} fails: {}", result.field, message),
        _ => println!("{} passes", result.field),
    }
}

fn years_before(today: NaiveDate, years: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year() - years, 1, 1).unwrap_or(today)
}

fn demo_draft(today: NaiveDate, email: &str) -> CandidateDraft {
    CandidateDraft {
        full_name: "Meera Pillai".to_string(),
        email: email.to_string(),
        phone: "7012345678".to_string(),
        date_of_birth: Some(years_before(today, 24)),
        qualification: "M.Sc".to_string(),
        graduation_year: Some(2023),
        score_type: ScoreType::Percentage,
        score: Some(71.0),
        screening_score: Some(58),
        interview_status: "Cleared".to_string(),
        national_id: "456712349870".to_string(),
        offer_sent: "Yes".to_string(),
        exceptions: ExceptionLedger::new(),
        flagged: false,
    }
}
