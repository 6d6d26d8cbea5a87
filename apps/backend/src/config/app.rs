//! Process-level settings read from the environment at startup.

use std::env;
use std::time::Duration;

use super::db::{must_var, DbKind};
use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, DEFAULT_TOKEN_TTL};

pub const DEFAULT_VENUE_NAME: &str = "默认赛场";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
    pub security: SecurityConfig,
    pub default_venue_name: String,
    /// Fixed dice seed; `None` means OS randomness.
    pub dice_seed: Option<u64>,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::config(format!("Environment variable '{name}' has an invalid value"))),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }
        let token_ttl = parse_var::<u64>("BACKEND_TOKEN_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        let default_venue_name = env::var("DEFAULT_VENUE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VENUE_NAME.to_string());

        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_var("BACKEND_PORT")?.unwrap_or(DEFAULT_PORT),
            db_kind: DbKind::from_env()?,
            security: SecurityConfig::new(jwt_secret.into_bytes()).with_token_ttl(token_ttl),
            default_venue_name,
            dice_seed: parse_var("BACKEND_DICE_SEED")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "BACKEND_JWT_SECRET",
        "BACKEND_TOKEN_TTL_SECS",
        "BACKEND_HOST",
        "BACKEND_PORT",
        "RACING_DB_KIND",
        "DEFAULT_VENUE_NAME",
        "BACKEND_DICE_SEED",
    ];

    fn clear() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_only_secret_is_set() {
        clear();
        env::set_var("BACKEND_JWT_SECRET", "s3cret");

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.db_kind, DbKind::Postgres);
        assert_eq!(cfg.security.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(cfg.default_venue_name, DEFAULT_VENUE_NAME);
        assert_eq!(cfg.dice_seed, None);
        clear();
    }

    #[test]
    #[serial]
    fn overrides_are_parsed() {
        clear();
        env::set_var("BACKEND_JWT_SECRET", "s3cret");
        env::set_var("BACKEND_PORT", "8080");
        env::set_var("BACKEND_TOKEN_TTL_SECS", "60");
        env::set_var("RACING_DB_KIND", "sqlite-memory");
        env::set_var("BACKEND_DICE_SEED", "99");
        env::set_var("DEFAULT_VENUE_NAME", "Track One");

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.security.token_ttl, Duration::from_secs(60));
        assert_eq!(cfg.db_kind, DbKind::SqliteMemory);
        assert_eq!(cfg.dice_seed, Some(99));
        assert_eq!(cfg.default_venue_name, "Track One");
        clear();
    }

    #[test]
    #[serial]
    fn missing_secret_and_bad_port_are_config_errors() {
        clear();
        assert!(AppConfig::from_env().is_err());

        env::set_var("BACKEND_JWT_SECRET", "s3cret");
        env::set_var("BACKEND_PORT", "not-a-port");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BACKEND_PORT"));
        clear();
    }
}
