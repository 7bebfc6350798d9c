use anyhow::Context;
use case_service::{
    config::Config, create_app, shutdown::shutdown_signal, AppState, InMemoryCaseRepository,
    SecurityHeadersConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;

    let state = AppState::new(InMemoryCaseRepository::new()).with_security_headers(
        SecurityHeadersConfig::for_environment(&config.security.environment),
    );
    let app = create_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let port = config.server.port;
    info!("Server is running on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("API documentation: http://localhost:{}/cases", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
