use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::ApplicantSubmission;
use super::service::{AssessmentServiceError, LoanAssessmentService};

/// Router builder exposing the assessment and schema endpoints.
pub fn assessment_router(service: Arc<LoanAssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/loans/assessments", post(assess_handler))
        .route("/api/v1/model/schema", get(schema_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<LoanAssessmentService>>,
    axum::Json(submission): axum::Json<ApplicantSubmission>,
) -> Response {
    match service.assess(&submission) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(AssessmentServiceError::Invalid(violation)) => {
            let payload = json!({
                "error": violation.to_string(),
                "field": violation.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler(State(service): State<Arc<LoanAssessmentService>>) -> Response {
    let schema = service.schema();
    let payload = json!({
        "width": schema.width(),
        "columns": schema.columns(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
