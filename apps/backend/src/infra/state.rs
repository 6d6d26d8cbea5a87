use std::sync::Arc;

use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::dice::{DiceRoller, RngDice};
use crate::services::venues::ensure_default_venue;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_kind: Option<DbKind>,
    dice: Arc<dyn DiceRoller>,
    default_venue: Option<String>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db_kind: None,
            dice: Arc::new(RngDice),
            default_venue: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_dice(mut self, dice: Arc<dyn DiceRoller>) -> Self {
        self.dice = dice;
        self
    }

    /// Seed a venue with this name when the database has none.
    pub fn with_default_venue(mut self, name: impl Into<String>) -> Self {
        self.default_venue = Some(name.into());
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let Some(kind) = self.db_kind else {
            return Ok(AppState::new_without_db(self.security_config).with_dice(self.dice));
        };

        let conn = bootstrap_db(kind).await?;
        if let Some(name) = &self.default_venue {
            ensure_default_venue(&conn, name).await?;
        }
        Ok(AppState::new(conn, self.security_config).with_dice(self.dice))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::venues::list_venues;

    #[tokio::test]
    async fn test_build_succeeds_without_db_option() {
        let state = build_state().build().await.unwrap();
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn test_default_venue_is_seeded_once() {
        let state = build_state()
            .with_db(DbKind::SqliteMemory)
            .with_default_venue("Main Track")
            .build()
            .await
            .unwrap();
        let db = state.db().unwrap();

        let venues = list_venues(db).await.unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].name, "Main Track");
        assert_eq!(venues[0].current_round, 1);

        // already populated: nothing new
        assert!(ensure_default_venue(db, "Other").await.unwrap().is_none());
        assert_eq!(list_venues(db).await.unwrap().len(), 1);
    }
}
