mod config;
mod engine;
mod errors;
mod report;
mod selection;
mod server;
mod session;

use crate::session::AppState;

#[tokio::main]
async fn main() {
    // Early stdout so the platform captures something even if tracing fails
    eprintln!("[parlay_ev] binary started, setting up logging...");

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("parlay_ev engine starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let port = cfg.server_port;
    let app_state = AppState::new(cfg);

    let app = axum::Router::new()
        .route(
            "/api/sessions/{user}/selections",
            axum::routing::post(server::routes::add_selection)
                .get(server::routes::list_selections)
                .delete(server::routes::reset_session),
        )
        .route(
            "/api/sessions/{user}/selections/{id}",
            axum::routing::delete(server::routes::remove_selection),
        )
        .route(
            "/api/sessions/{user}/evaluate",
            axum::routing::post(server::routes::evaluate),
        )
        .route("/api/counters", axum::routing::get(server::routes::get_counters))
        .route("/ws", axum::routing::get(server::ws::ws_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
