use std::net::SocketAddr;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use common::log;

use crate::matchmaker::{LobbyStats, Matchmaker};
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub matchmaker: Matchmaker,
}

pub fn build_router(state: WebServerState, static_files_path: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(landing_page))
        .route("/join", get(ws_upgrade_handler));
    if let Some(path) = static_files_path {
        app = app.nest_service("/assets", ServeDir::new(path));
    }
    app.layer(cors).with_state(state)
}

pub async fn run_web_server(
    state: WebServerState,
    addr: SocketAddr,
    static_files_path: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state, static_files_path.as_deref());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log!("Kalah server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log!("Shutdown signal received");
}

async fn landing_page(State(state): State<WebServerState>) -> impl IntoResponse {
    Html(render_landing_page(state.matchmaker.stats().await))
}

fn render_landing_page(stats: LobbyStats) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Kalah</title></head>\n<body>\n\
         <h1>Kalah</h1>\n\
         <p>There are {} game(s) and {} pending player(s) online.</p>\n\
         <p>Connect a WebSocket to <code>/join</code> to play.</p>\n\
         </body>\n</html>\n",
        stats.sessions, stats.pending_players
    )
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state.matchmaker))
}
