//! Request helpers for driving the racing API in integration tests.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use serde_json::{json, Value};

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub async fn send<S>(app: &S, req: Request) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    test::call_service(app, req).await
}

/// Sends the request, asserts `expected` and returns the JSON body.
pub async fn send_json<S>(app: &S, req: Request, expected: StatusCode) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = send(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        expected,
        "unexpected status; body: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("response body should be JSON")
}

pub async fn register<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let body = send_json(app, req, StatusCode::OK).await;
    body["token"]
        .as_str()
        .expect("register returns a token")
        .to_string()
}

pub async fn enter<S>(app: &S, token: &str, venue_id: i64)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("/venues/{venue_id}/enter"))
        .insert_header(bearer(token))
        .to_request();
    let body = send_json(app, req, StatusCode::OK).await;
    assert_eq!(body, json!({ "status": "ok", "venue_id": venue_id }));
}

pub fn roll_request(token: &str, venue_id: i64, mode: &str) -> Request {
    test::TestRequest::post()
        .uri(&format!("/venues/{venue_id}/roll"))
        .insert_header(bearer(token))
        .set_json(json!({ "mode": mode }))
        .to_request()
}

pub async fn roll<S>(app: &S, token: &str, venue_id: i64, mode: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    send_json(app, roll_request(token, venue_id, mode), StatusCode::OK).await
}

pub async fn get<S>(app: &S, token: &str, uri: &str, expected: StatusCode) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request();
    send_json(app, req, expected).await
}

pub async fn venue_detail<S>(app: &S, token: &str, venue_id: i64) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    get(app, token, &format!("/venues/{venue_id}"), StatusCode::OK).await
}

pub fn start_new_race_request(token: &str, venue_id: i64) -> Request {
    test::TestRequest::post()
        .uri(&format!("/venues/{venue_id}/start_new_race"))
        .insert_header(bearer(token))
        .to_request()
}

/// The participant entry for `username` in a venue detail body.
pub fn participant<'a>(detail: &'a Value, username: &str) -> &'a Value {
    detail["participants"]
        .as_array()
        .expect("participants array")
        .iter()
        .find(|p| p["username"] == username)
        .unwrap_or_else(|| panic!("{username} should be a participant"))
}
