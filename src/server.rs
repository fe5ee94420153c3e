use std::future::Future;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use crate::handlers::{self, AppState};

async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(api_key) = state.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    if token == api_key {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Owns the route table and the listening socket for the sender API.
pub struct Server {
    addr: String,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(addr: impl Into<String>, state: AppState) -> Self {
        Self {
            addr: addr.into(),
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/send-message",
                post(handlers::send_message).fallback(handlers::method_not_allowed),
            )
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware,
            ))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serves until `shutdown` resolves; the listener is dropped on return.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Starting server on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}
