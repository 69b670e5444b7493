use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use audition_api::config::ServerConfig;
use audition_api::router::build_app_router;
use audition_api::state::AppState;
use audition_api::telemetry::init_tracing;
use audition_core::ffmpeg::probe_version;
use audition_pipeline::FfmpegConcatenator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Media tooling ---
    match probe_version(&config.ffmpeg_path).await {
        Ok(version) => tracing::info!(ffmpeg = %config.ffmpeg_path, %version, "ffmpeg available"),
        Err(e) => tracing::warn!(
            ffmpeg = %config.ffmpeg_path,
            error = %e,
            "ffmpeg unavailable; merging will fail until it is installed"
        ),
    }
    let concatenator = Arc::new(FfmpegConcatenator::new(config.ffmpeg_path.clone()));

    // --- App state ---
    let state = AppState::initialize(config.clone(), concatenator)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!(
        data_dir = %config.paths.data_dir.display(),
        uploads_dir = %config.paths.uploads_dir.display(),
        "Data store ready"
    );

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Server ---
    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
