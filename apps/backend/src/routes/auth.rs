use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::users;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/register
async fn register(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CredentialsRequest { username, password } = body.into_inner();
    let security = app_state.security.clone();

    let session = with_txn(&app_state, |txn| {
        Box::pin(async move { users::register(txn, &security, &username, &password).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        token: session.token,
    }))
}

/// POST /auth/login
async fn login(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CredentialsRequest { username, password } = body.into_inner();
    let security = app_state.security.clone();

    let session = with_txn(&app_state, |txn| {
        Box::pin(async move { users::login(txn, &security, &username, &password).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        token: session.token,
    }))
}

/// GET /auth/me
async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/me", web::get().to(me));
}
