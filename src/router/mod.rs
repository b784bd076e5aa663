//! Routing module for the reference gateway

use crate::backend::{self, SharedState};
use axum::{body::Body, extract::Request, middleware::Next, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: Log requests
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let method = req.method().clone();
        let uri = req.uri().clone();
        info!("REQ: {method} {uri}");
        let res = next.run(req).await;
        if !res.status().is_success() {
            warn!("RES: {} {method} {uri}", res.status());
        }
        res
    });

    // Middleware: CORS (the web client is served from another origin)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest(backend::API_ROOT, backend::routes())
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}
