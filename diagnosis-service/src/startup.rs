use crate::config::{DiagnosisConfig, ProviderBackend};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::TextProvider;
use crate::services::{DiagnosisDb, DiagnosisService};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state, constructed once at startup and injected into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: DiagnosisConfig,
    pub db: DiagnosisDb,
    pub diagnosis: DiagnosisService,
}

/// Build the full application router for the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(handlers::root))
        .route("/diagnose", post(handlers::create_diagnosis))
        .route("/history", get(handlers::list_history))
        .route("/history/:id", get(handlers::get_diagnosis));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(config: DiagnosisConfig) -> Result<Self, AppError> {
        let db = DiagnosisDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let provider: Arc<dyn TextProvider> = match config.ai.provider {
            ProviderBackend::Gemini => Arc::new(
                GeminiTextProvider::new(GeminiConfig {
                    api_key: config.google.api_key.clone(),
                    model: config.models.text_model.clone(),
                })
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?,
            ),
            ProviderBackend::Mock => Arc::new(MockTextProvider::new(true)),
        };
        tracing::info!(
            model = %config.models.text_model,
            backend = ?config.ai.provider,
            "Initialized text provider"
        );

        let state = AppState {
            config: config.clone(),
            db,
            diagnosis: DiagnosisService::new(provider),
        };

        // Port 0 = random port for testing
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
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &DiagnosisDb {
        &self.state.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);
        axum::serve(self.listener, app).await
    }
}
