use actix_web::web;

pub mod auth;
pub mod health;
pub mod venues;

/// Registers every route; `main.rs` and the integration tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // /auth/register, /auth/login, /auth/me
    cfg.service(web::scope("/auth").configure(auth::configure_routes));

    // /venues/**
    cfg.service(web::scope("/venues").configure(venues::configure_routes));
}
