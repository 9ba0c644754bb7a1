//! HTTP Gateway
//!
//! axum router over the document store and the transfer coordinator. Every
//! handler is a direct pass-through: one store (or coordinator) call plus
//! status-code translation.

pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

pub use state::AppState;

/// Build the full API router.
///
/// Exposed separately from [`run_server`] so tests can serve it on an
/// ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    let airline_routes = Router::new()
        .route("/list", get(handlers::list_airlines))
        .route("/to-airport", get(handlers::airlines_to_airport))
        .route(
            "/{id}",
            get(handlers::get_airline)
                .post(handlers::create_airline)
                .put(handlers::update_airline)
                .delete(handlers::delete_airline),
        );

    let airport_routes = Router::new()
        .route("/list", get(handlers::list_airports))
        .route("/direct-connections", get(handlers::direct_connections))
        .route(
            "/{id}",
            get(handlers::get_airport)
                .post(handlers::create_airport)
                .put(handlers::update_airport)
                .delete(handlers::delete_airport),
        );

    let route_routes = Router::new().route(
        "/{id}",
        get(handlers::get_route)
            .post(handlers::create_route)
            .put(handlers::update_route)
            .delete(handlers::delete_route),
    );

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/airline", airline_routes)
        .nest("/api/v1/airport", airport_routes)
        .nest("/api/v1/route", route_routes)
        .route("/api/v1/profile", post(handlers::create_profile))
        .route("/api/v1/profile/list", get(handlers::list_profiles))
        .route("/api/v1/profile/transfer", post(handlers::create_transfer))
        .route(
            "/api/v1/profile/{pid}",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .with_state(state)
}

/// Start the HTTP gateway server.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {addr}: {e}");
            eprintln!("   Hint: Port {port} may already be in use. Check with: lsof -i :{port}");
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{addr}");
    println!("📂 API base: /api/v1");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {e}");
        std::process::exit(1);
    }
}
