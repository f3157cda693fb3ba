/**
 * TrashDrop Health Server Entry Point
 *
 * Serves `/healthz`, `/ready` and `/live` on `SERVER_PORT` (default 3000).
 */

use trashdrop::backend::BackendError;

#[tokio::main]
async fn main() -> Result<(), BackendError> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = trashdrop::backend::server::load_server_config()?;
    let app = trashdrop::backend::server::create_app(&config).await;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Health check available at http://127.0.0.1:{}/healthz", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
