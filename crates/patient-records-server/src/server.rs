//! HTTP server wiring and lifecycle.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use patient_records_core::{JsonFileStore, PatientService, PatientStore, StoreError};

use crate::config::ServerConfig;
use crate::handlers;

/// Shared application state.
pub struct AppState {
    pub service: PatientService,
}

impl AppState {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self {
            service: PatientService::new(store),
        }
    }
}

/// Build the router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/about", get(handlers::about))
        .route("/view", get(handlers::view))
        .route("/patient/:patient_id", get(handlers::get_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:patient_id", put(handlers::update_patient))
        .route("/delete/:patient_id", delete(handlers::delete_patient))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a server backed by the configured JSON file, creating the
    /// file if it does not exist.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(&config.data_file)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Creates a server over an arbitrary store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn PatientStore>) -> Self {
        let state = Arc::new(AppState::new(store));
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();
        let addr = self.config.addr();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            addr = %addr,
            data_file = %self.config.data_file.display(),
            "Patient records server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
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
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
