mod common;
mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use racing_backend::errors::ErrorCode;
use racing_backend::middleware::RequestTrace;
use racing_backend::services::dice::RngDice;
use racing_backend::state::app_state::AppState;
use racing_backend::AppError;
use serde_json::json;
use support::{build_test_state, create_test_app, test_security};

async fn failing(code: ErrorCode) -> Result<HttpResponse, AppError> {
    Err(match code {
        ErrorCode::VenueNotFound => AppError::not_found(code, "Venue 7 not found"),
        ErrorCode::OptimisticLock => AppError::conflict(code, "Venue changed underneath you"),
        ErrorCode::GameOver => AppError::invalid_state(code, "Game over"),
        ErrorCode::InvalidVenueName => AppError::invalid(code, "Venue name must be 1 to 128 characters"),
        _ => AppError::db("connection reset while writing venue_round_results"),
    })
}

#[actix_web::test]
async fn client_errors_keep_their_detail() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/404", web::get().to(|| failing(ErrorCode::VenueNotFound)))
            .route("/409", web::get().to(|| failing(ErrorCode::OptimisticLock)))
            .route("/400", web::get().to(|| failing(ErrorCode::GameOver)))
            .route("/422", web::get().to(|| failing(ErrorCode::InvalidVenueName))),
    )
    .await;

    for (uri, code, status, detail) in [
        ("/404", "VENUE_NOT_FOUND", StatusCode::NOT_FOUND, "Venue 7 not found"),
        ("/409", "OPTIMISTIC_LOCK", StatusCode::CONFLICT, "changed underneath"),
        ("/400", "GAME_OVER", StatusCode::BAD_REQUEST, "Game over"),
        ("/422", "INVALID_VENUE_NAME", StatusCode::UNPROCESSABLE_ENTITY, "1 to 128"),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let problem =
            assert_problem_details_from_service_response(resp, code, status, Some(detail)).await;
        assert_eq!(problem.type_, format!("https://racing.app/errors/{code}"));
    }
}

#[actix_web::test]
async fn server_errors_hide_their_cause() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/500", web::get().to(|| failing(ErrorCode::DbError))),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/500").to_request()).await;
    let problem = assert_problem_details_from_service_response(
        resp,
        "DB_ERROR",
        StatusCode::INTERNAL_SERVER_ERROR,
        None,
    )
    .await;
    assert_eq!(problem.detail, "An internal error occurred");
    assert_eq!(problem.title, "Db Error");
}

#[actix_web::test]
async fn missing_database_is_service_unavailable() {
    let state = AppState::new_without_db(test_security());
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": "alice", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "DB_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        None,
    )
    .await;
}

#[actix_web::test]
async fn success_responses_carry_a_trace_id() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header");
    assert_eq!(trace_id.len(), 36);
    Ok(())
}

#[actix_web::test]
async fn health_reports_database_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert_eq!(body["migrations"], "m20260211_000001_init");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));

    let no_db = create_test_app(AppState::new_without_db(test_security())).build().await;
    let resp = test::call_service(&no_db, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "error");
    assert_eq!(body["migrations"], "unknown");
    Ok(())
}
