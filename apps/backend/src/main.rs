use actix_web::{web, App, HttpServer};
use continental::config::{GameConfig, ServerConfig};
use continental::middleware::cors::cors_middleware;
use continental::middleware::request_trace::RequestTrace;
use continental::middleware::structured_logger::StructuredLogger;
use continental::middleware::trace_span::TraceSpan;
use continental::routes;
use continental::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let server = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Invalid server configuration: {e}");
            std::process::exit(1);
        }
    };
    let game = match GameConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Invalid game configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %server.host,
        port = server.port,
        discard_window_secs = game.discard_window_secs,
        first_draw_window_secs = game.first_draw_window_secs,
        warning_limit = game.warning_limit,
        max_players = game.max_players,
        "Starting Continental backend"
    );

    let data = web::Data::new(AppState::new(game));
    let origins = server.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
