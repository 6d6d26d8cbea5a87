use std::sync::Arc;
use std::time::Duration;

use racing_backend::config::db::DbKind;
use racing_backend::infra::state::build_state;
use racing_backend::services::dice::DiceRoller;
use racing_backend::state::app_state::AppState;
use racing_backend::state::security_config::SecurityConfig;
use racing_backend::AppError;

/// Id of the venue seeded into every fresh test database.
pub const DEFAULT_VENUE_ID: i64 = 1;
pub const DEFAULT_VENUE_NAME: &str = "默认赛场";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
        .with_token_ttl(Duration::from_secs(3600))
}

/// Fresh in-memory SQLite database, migrated and seeded with the default venue.
///
/// Every call gets its own database, so tests never share rows.
pub async fn build_test_state(dice: Arc<dyn DiceRoller>) -> Result<AppState, AppError> {
    build_state()
        .with_db(DbKind::SqliteMemory)
        .with_security(test_security())
        .with_dice(dice)
        .with_default_venue(DEFAULT_VENUE_NAME)
        .build()
        .await
}
