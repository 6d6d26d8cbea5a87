use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Serialize;

use super::auth_token::AuthToken;
use crate::auth::jwt::verify_access_token;
use crate::db::require_db;
use crate::error::AppError;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The authenticated caller, resolved from the bearer token and confirmed in the database.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = AuthToken::parse(&req)?;
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let claims = verify_access_token(&token.token, &state.security)?;
            let user_id = claims.user_id()?;

            // A token for a user that no longer exists is just an invalid token.
            let user = users::find_user_by_id(require_db(state)?, user_id)
                .await?
                .ok_or_else(AppError::unauthorized_invalid_jwt)?;

            Ok(CurrentUser {
                id: user.id,
                username: user.username,
            })
        })
    }
}
