use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use racing_backend::config::app::AppConfig;
use racing_backend::infra::state::build_state;
use racing_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use racing_backend::routes;
use racing_backend::services::dice::{DiceRoller, RngDice, SeededDice};
use racing_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables come from the runtime (docker env_file, or `set -a; . ./.env`).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let dice: Arc<dyn DiceRoller> = match config.dice_seed {
        Some(seed) => {
            info!(seed, "Using seeded dice");
            Arc::new(SeededDice::new(seed))
        }
        None => Arc::new(RngDice),
    };

    let app_state = match build_state()
        .with_db(config.db_kind)
        .with_security(config.security.clone())
        .with_dice(dice)
        .with_default_venue(config.default_venue_name.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, db = ?config.db_kind, "Starting racing backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
