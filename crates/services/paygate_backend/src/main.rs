// File: services/paygate_backend/src/main.rs
use axum::{routing::get, Json, Router};
use paygate_checkout::routes as checkout_routes;
use paygate_checkout::CipherEnvelope;
use paygate_config::load_config;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() {
    paygate_common::logging::init();

    // Missing or malformed configuration (including key material) is fatal:
    // the service must not accept requests it cannot seal or open.
    let config = Arc::new(load_config().expect("Failed to load config"));
    let envelope = Arc::new(
        CipherEnvelope::from_config(&config.gateway).expect("Invalid gateway key material"),
    );

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Paygate API!" }))
        .merge(checkout_routes(config.clone(), envelope));

    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
