use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::state::app_state::AppState;

/// Liveness report. `rooms` counts rooms still registered, started or not.
#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    app_version: &'static str,
    rooms: usize,
    #[serde(with = "time::serde::rfc3339")]
    time: OffsetDateTime,
}

async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        rooms: app_state.rooms.len(),
        time: OffsetDateTime::now_utc(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
