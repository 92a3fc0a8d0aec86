use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every route. `main.rs` and the integration test server wrap
/// this with the same middleware stack.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Lobby: /api/room/**
    cfg.service(web::scope("/api/room").configure(rooms::configure_routes));

    // Realtime: /api/ws/**
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
