use axum::{
    Router,
    http::{HeaderValue, header::InvalidHeaderValue},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{
    config::{Config, ConfigError},
    handlers::rest,
    repository::RepositoryError,
    service::NoteService,
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid CORS origin '{origin}': {source}")]
    CorsOrigin {
        origin: String,
        source: InvalidHeaderValue,
    },

    #[error("Database connection failed: {0}")]
    StoreUnavailable(RepositoryError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads the configuration, checks the store once and serves until a
/// shutdown signal arrives.
pub async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        "Configured notes store"
    );

    let service = Arc::new(NoteService::new(config.database.clone()));
    service
        .check_connection()
        .await
        .map_err(StartupError::StoreUnavailable)?;
    tracing::info!("Database connection successful");

    let app = build_app(&config, service)?;

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!("REST server starting, listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

pub fn build_app(config: &Config, service: Arc<NoteService>) -> Result<Router, StartupError> {
    Ok(rest::router(service)
        .layer(cors_layer(&config.server.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Listed origins only, with credentials. Methods and headers are mirrored
/// from the request since wildcards are not allowed alongside credentials.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|source| StartupError::CorsOrigin {
                origin: origin.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
