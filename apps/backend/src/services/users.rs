//! Registration, login and identity lookups.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::users::{self, User};
use crate::state::security_config::SecurityConfig;

pub const MAX_USERNAME_CHARS: usize = 64;

/// Trims and NFC-normalises a username, rejecting empty or overlong names.
pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let name: String = raw.trim().nfc().collect();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "Username must not be empty",
        ));
    }
    if name.chars().count() > MAX_USERNAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!("Username must be at most {MAX_USERNAME_CHARS} characters"),
        ));
    }
    Ok(name)
}

fn require_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            "Password must not be empty",
        ));
    }
    Ok(())
}

/// A freshly authenticated user and the bearer token minted for it.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    username: &str,
    password: &str,
) -> Result<Session, AppError> {
    let username = normalize_username(username)?;
    require_password(password)?;

    if users::find_user_by_username(conn, &username).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::UniqueUsername,
            "Username already taken",
        )
        .into());
    }

    // The unique index still catches a concurrent registration of the same name.
    let user = users::create_user(conn, &username, &hash_password(password)?).await?;
    info!(user_id = user.id, "User registered");

    let token = mint_access_token(user.id, &user.username, SystemTime::now(), security)?;
    Ok(Session { user, token })
}

pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    username: &str,
    password: &str,
) -> Result<Session, AppError> {
    // Malformed input reads as bad credentials here; there is nothing to validate against.
    let Ok(username) = normalize_username(username) else {
        return Err(AppError::invalid_credentials());
    };

    let Some(user) = users::find_user_by_username(conn, &username).await? else {
        warn!("Login for unknown username");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "Login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let token = mint_access_token(user.id, &user.username, SystemTime::now(), security)?;
    Ok(Session { user, token })
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, AppError> {
    users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))
}
