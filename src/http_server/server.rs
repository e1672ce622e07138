//! # HTTP Server
//!
//! Axum front end for the item service. All requests reach a single
//! fallback handler that hands them to the route table in [`crate::rest_api`];
//! the CORS policy and request tracing wrap it.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, Uri};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::rest_api::{ApiError, ApiRequest, ApiResponse, ItemService};
use crate::store::ItemStore;

use super::config::HttpServerConfig;
use super::cors::cors_policy;

/// HTTP server for the item service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an item service
    pub fn new<S: ItemStore + 'static>(config: HttpServerConfig, service: ItemService<S>) -> Self {
        Self {
            config,
            router: app(service),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        tracing::info!(addr = %listener.local_addr()?, "http server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("http server stopped");
        Ok(())
    }
}

/// Build the full router: CORS policy, request tracing, item dispatch
///
/// Request bodies are unbounded so that every answer comes from the item
/// router with a JSON envelope; there is no 413.
pub fn app<S: ItemStore + 'static>(service: ItemService<S>) -> Router {
    Router::new()
        .fallback(dispatch::<S>)
        .layer(DefaultBodyLimit::disable())
        .with_state(Arc::new(service))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(cors_policy)),
        )
}

/// Run the store-backed handler off the async workers
async fn dispatch<S: ItemStore + 'static>(
    State(service): State<Arc<ItemService<S>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = ApiRequest::from_uri(method, &uri, body);

    match tokio::task::spawn_blocking(move || service.handle(&request)).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "request handler aborted");
            ApiResponse::from(ApiError::internal("Internal server error")).into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
