pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// The configured connection, or `DB_UNAVAILABLE` when the state was built without one.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db()
        .ok_or_else(|| AppError::db_unavailable("Database not configured"))
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;
    use crate::errors::ErrorCode;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn require_db_without_db_is_unavailable() {
        let app_state = AppState::new_without_db(SecurityConfig::default());

        let err = require_db(&app_state).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DbUnavailable);
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
