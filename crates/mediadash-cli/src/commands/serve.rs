use crate::output::Output;
use crate::server::{build_router, AppState};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

pub async fn run_serve(config_path: Option<PathBuf>, bind: Option<String>, output: &Output) -> Result<()> {
    let loaded = super::load(config_path)?;
    let addr = bind.unwrap_or_else(|| {
        format!("{}:{}", loaded.config.server.bind_address, loaded.config.server.port)
    });

    let dashboard = loaded.dashboard()?;
    let sources = dashboard.sources().configured_sources();
    if sources.is_empty() {
        output.warn("No sources configured; every view will answer 503");
    } else {
        output.info(format!("Sources: {}", sources.join(", ")));
    }

    let app = build_router(AppState::new(dashboard));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind {}: {}", addr, e))?;

    info!(addr = %addr, sources = ?sources, "Dashboard server listening");
    output.success(format!("Serving on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
