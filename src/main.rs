use bookstore_client::backend::{StoreState, API_ROOT};
use bookstore_client::bootstrap::init_tracing;
use bookstore_client::config::Config;
use bookstore_client::router::create_app_router;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = Config::load()?;

    // Build application router with all routes and middleware
    let app = create_app_router(StoreState::shared());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Bookstore gateway running on http://{addr}{API_ROOT}/");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
