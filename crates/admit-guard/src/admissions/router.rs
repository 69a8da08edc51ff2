use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::{CandidateDraft, CandidateId};
use super::evaluation::EvaluationError;
use super::repository::{CandidateStore, StoreError};
use super::service::{AdmissionService, AdmissionServiceError};

/// Router builder exposing rule evaluation, submission, and the audit log.
pub fn admissions_router<S>(service: Arc<AdmissionService<S>>) -> Router
where
    S: CandidateStore + 'static,
{
    Router::new()
        .route("/api/rules", get(rules_handler::<S>))
        .route("/api/evaluate", post(evaluate_handler::<S>))
        .route("/api/evaluate/:field", post(evaluate_field_handler::<S>))
        .route(
            "/api/candidates",
            get(list_handler::<S>).post(submit_handler::<S>),
        )
        .route("/api/candidates/summary", get(summary_handler::<S>))
        .route("/api/candidates/export.csv", get(export_csv_handler::<S>))
        .route("/api/candidates/export.json", get(export_json_handler::<S>))
        .route("/api/candidates/:candidate_id", delete(delete_handler::<S>))
        .with_state(service)
}

pub(crate) async fn rules_handler<S>(State(service): State<Arc<AdmissionService<S>>>) -> Response
where
    S: CandidateStore + 'static,
{
    let payload = json!({ "rules": service.catalog().views() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn evaluate_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    axum::Json(draft): axum::Json<CandidateDraft>,
) -> Response
where
    S: CandidateStore + 'static,
{
    let today = Local::now().date_naive();
    let results = service.evaluate_record(&draft, today);
    let assessment = service.gate().assess(&draft, &results);

    let payload = json!({
        "results": results,
        "submittable": assessment.is_submittable(),
        "assessment": assessment,
        "flagged": service.gate().should_flag(&draft),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn evaluate_field_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(field): Path<String>,
    axum::Json(draft): axum::Json<CandidateDraft>,
) -> Response
where
    S: CandidateStore + 'static,
{
    let today = Local::now().date_naive();
    match service.evaluate_named(&field, &draft, today) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error @ EvaluationError::UnknownField(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<S>(State(service): State<Arc<AdmissionService<S>>>) -> Response
where
    S: CandidateStore + 'static,
{
    match service.candidates() {
        Ok(candidates) => (StatusCode::OK, axum::Json(candidates)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    axum::Json(draft): axum::Json<CandidateDraft>,
) -> Response
where
    S: CandidateStore + 'static,
{
    match service.submit(&draft) {
        Ok(candidate) => (StatusCode::CREATED, axum::Json(candidate)).into_response(),
        Err(AdmissionServiceError::NotSubmittable(assessment)) => {
            let payload = json!({
                "error": assessment.summary(),
                "assessment": assessment,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ AdmissionServiceError::DuplicateEmail { .. })
        | Err(error @ AdmissionServiceError::Store(StoreError::Conflict)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
{
    let id = CandidateId(candidate_id);
    match service.delete(&id) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response(),
        Err(AdmissionServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "error": format!("candidate {id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn summary_handler<S>(State(service): State<Arc<AdmissionService<S>>>) -> Response
where
    S: CandidateStore + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn export_csv_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
) -> Response
where
    S: CandidateStore + 'static,
{
    match service.export_csv() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"admitguard_audit_log.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn export_json_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
) -> Response
where
    S: CandidateStore + 'static,
{
    match service.export_json() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"admitguard_audit_log.json\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: AdmissionServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
