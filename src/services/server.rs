use anyhow::Result;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::geocoding::NominatimGeocoder;
use crate::persistence::ModelStore;
use crate::ranking::RecommendationService;

pub struct ServerService {
    port: u16,
    model_path: String,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, model_path: String, config: AppConfig) -> Self {
        Self {
            port,
            model_path,
            config,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let store = ModelStore::new(&self.model_path);
        let model = tokio::task::spawn_blocking(move || store.load()).await??;
        info!(
            "Serving model built at {} ({} restaurants, {} collaborative)",
            model.built_at.to_rfc3339(),
            model.catalog.len(),
            model.collaborative.method.as_str()
        );
        let service = RecommendationService::new(model, &self.config);

        let geocoder = NominatimGeocoder::new(&self.config.geocoder)?;
        let state = Arc::new(AppState::new(
            service,
            geocoder,
            self.config.clone(),
            self.model_path.clone(),
        ));

        let app = create_router(state).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
