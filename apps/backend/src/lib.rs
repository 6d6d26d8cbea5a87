#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use config::app::AppConfig;
pub use config::db::{db_url, DbKind};
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::{AuthToken, CurrentUser, RoundNumber, VenueId};
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
pub use services::dice::{DiceRoller, RngDice, ScriptedDice, SeededDice};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Quiet test subscriber for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
