use crate::config::{RepositoryBackend, TextConfig};
use crate::routes;
use crate::services::{
    InMemoryTextRepository, MongoDb, MongoTextRepository, TextRepository, TextService,
};
use axum::Router;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Clone)]
pub struct AppState {
    pub texts: TextService,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    pub async fn build(config: TextConfig) -> Result<Self, AppError> {
        let repository = connect_repository(&config).await?;

        let state = AppState {
            texts: TextService::new(repository),
        };

        let router = routes::router(state.clone());

        // Port 0 binds a random port (used by tests)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn connect_repository(config: &TextConfig) -> Result<Arc<TextRepository>, AppError> {
    match config.repository.backend {
        RepositoryBackend::Mongo => {
            let db = MongoDb::connect(
                config.mongodb.uri.expose_secret(),
                &config.mongodb.database,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

            tracing::info!(
                collection = %config.mongodb.collection,
                "Using MongoDB text repository"
            );
            Ok(Arc::new(MongoTextRepository::new(
                db,
                &config.mongodb.collection,
            )))
        }
        RepositoryBackend::Memory => {
            tracing::warn!("Using in-memory text repository; data is lost on restart");
            Ok(Arc::new(InMemoryTextRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
