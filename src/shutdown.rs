//! Shutdown signal handling for the HTTP server.

use tokio::signal;
use tracing::{error, info};

/// Resolves once SIGINT or SIGTERM is received.
pub async fn shutdown_signal() {
    let signal_type = tokio::select! {
        () = wait_for_sigint() => "SIGINT",
        () = wait_for_sigterm() => "SIGTERM",
    };
    info!("Received {}, initiating graceful shutdown", signal_type);
}

async fn wait_for_sigint() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for SIGINT: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn wait_for_sigterm() {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    std::future::pending::<()>().await;
}
