mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::airports::AirportDirectory;

pub fn build_router() -> Router {
    let state = Arc::new(AppState {
        directory: AirportDirectory::new(),
    });

    Router::new()
        .route("/api/recommendation", get(handlers::recommendation))
        .route("/api/sun", get(handlers::sun_position))
        .route("/api/airports/search", get(handlers::airport_search))
        .route("/api/airports", get(handlers::airport_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16) {
    let app = build_router();
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Sunside server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    });
}
