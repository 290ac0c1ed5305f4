use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::underwriting::artifacts::{ModelHandles, StandardScaler};
use crate::underwriting::router::assess_handler;
use crate::underwriting::LoanAssessmentService;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn assessment_request(payload: &Value) -> Request<Body> {
    Request::post("/api/v1/loans/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn assessment_route_returns_report() {
    let router = router(constant_model(2.0));
    let payload = serde_json::to_value(scenario_submission()).unwrap();

    let response = router.oneshot(assessment_request(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verdict"], "approved");
    assert_eq!(body["headline"], "APPROVED");
    assert_eq!(body["score_label"], "Probability");
    assert!(body["assessed_at"].is_string());
}

#[tokio::test]
async fn assessment_route_accepts_form_labels() {
    let router = router(weighted_model("Employment_Status_Self-employed", -5.0, 1.0));
    let payload = json!({
        "gender": "Female",
        "age": 35,
        "marital_status": "Married",
        "education": "Not Graduate",
        "dependents": "3+",
        "applicant_income": 4200,
        "coapplicant_income": 1000,
        "savings": 8000,
        "employment_status": "Self-employed",
        "employer_category": "Business",
        "loan_amount": 90000,
        "loan_term": 180,
        "credit_score": 680,
        "loan_purpose": "Car",
        "property_area": "Semiurban",
        "existing_loans": 1
    });

    let response = router.oneshot(assessment_request(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verdict"], "rejected");
    assert_eq!(body["score_label"], "Risk Score");
}

#[tokio::test]
async fn out_of_range_submission_is_unprocessable() {
    let router = router(constant_model(2.0));
    let mut payload = serde_json::to_value(scenario_submission()).unwrap();
    payload["credit_score"] = json!(900);

    let response = router.oneshot(assessment_request(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["field"], "credit_score");
}

#[tokio::test]
async fn pipeline_failure_is_internal_error() {
    let handles = Arc::new(ModelHandles::new(
        constant_model(2.0),
        StandardScaler {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        },
        schema(),
    ));
    let service = Arc::new(LoanAssessmentService::new(handles));

    let response = assess_handler(State(service), axum::Json(scenario_submission())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("scaler"));
}

#[tokio::test]
async fn schema_route_lists_training_columns() {
    let router = router(constant_model(2.0));

    let response = router
        .oneshot(
            Request::get("/api/v1/model/schema")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["width"], 25);
    assert_eq!(body["columns"][0], "Applicant_Income");
    assert_eq!(body["columns"][24], "Applicant_Income_log");
}
