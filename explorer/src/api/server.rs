//! API server implementation

use std::future::Future;
use std::path::PathBuf;

use axum::{http::Method, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{routes, AppState};
use crate::error::{ExplorerError, Result};
use crate::websocket;

pub struct ApiServer {
    state: AppState,
    listen_addr: String,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    pub fn new(state: AppState, listen_addr: String, static_dir: Option<PathBuf>) -> Self {
        Self { state, listen_addr, static_dir }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any);

        let api = Router::new()
            .merge(routes::info::routes(self.state.clone()))
            .merge(routes::blocks::routes(self.state.clone()))
            .merge(routes::mempool::routes(self.state.clone()))
            .merge(routes::addresses::routes(self.state.clone()))
            .merge(routes::peers::routes(self.state.clone()))
            .layer(CompressionLayer::new());

        let mut app = Router::new()
            .nest("/api", api)
            .merge(websocket::routes(self.state.cache.clone()));

        if let Some(dir) = &self.static_dir {
            app = app.fallback_service(ServeDir::new(dir));
        }

        app.layer(cors).layer(TraceLayer::new_for_http())
    }

    pub async fn start<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.listen_addr)
            .await
            .map_err(|e| ExplorerError::Internal(format!("Failed to bind {}: {}", self.listen_addr, e)))?;

        tracing::info!("API server listening on http://{}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ExplorerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
