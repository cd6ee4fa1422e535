//! # HTTP Boundary
//!
//! Axum service exposing the recipe suggestion endpoint:
//!
//! - `POST /recipes`: body `{"products": [...]}`; derives the available
//!   ingredients, obtains candidates from the generation client, annotates
//!   them with match data, and responds with `{"count": n, "recipes": [...]}`
//! - `GET /health`: liveness probe
//!
//! Upstream generation failures surface as HTTP 500 with the
//! `{"error": ..., "details": ...}` envelope; malformed request bodies get
//! the same envelope with a 400. An empty or missing `products` array is
//! not an error: the response is simply `{"count": 0, "recipes": []}`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{ExtractionConfig, ServerConfig};
use crate::extraction::available_ingredients;
use crate::generation::RecipeGenerator;
use crate::matching::annotate;
use crate::recipe_model::{AnnotatedRecipe, Product};

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    /// Recipe candidate source (the completion API client in production,
    /// a stub in tests)
    pub generator: Arc<dyn RecipeGenerator>,
    /// Ingredient extraction options
    pub extraction: ExtractionConfig,
}

/// Body of `POST /recipes`
#[derive(Debug, Deserialize)]
pub struct RecipesRequest {
    /// Scanned products with remaining quantity; may be absent or empty
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Body of a successful `POST /recipes` response
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    pub count: usize,
    pub recipes: Vec<AnnotatedRecipe>,
}

/// Request-handling failure, rendered as the `{"error", "details"}`
/// envelope the mobile client expects
pub enum ApiError {
    /// Malformed request body
    BadRequest(String),
    /// The generation collaborator failed (network, API, or parse error)
    Upstream(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::BadRequest(details) => {
                (StatusCode::BAD_REQUEST, "Bad request", details)
            }
            ApiError::Upstream(err) => {
                let details = format!("{err:#}");
                error!(error = %details, "Recipe request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", details)
            }
        };

        let body = Json(json!({
            "error": error,
            "details": details,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Build the service router
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/recipes", post(suggest_recipes))
        .route("/health", get(health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Handle `POST /recipes`: extraction, generation, annotation
async fn suggest_recipes(
    State(state): State<AppState>,
    body: Result<Json<RecipesRequest>, JsonRejection>,
) -> Result<Json<RecipesResponse>, ApiError> {
    let Json(request) = body?;

    let available = available_ingredients(&request.products, &state.extraction);
    info!(
        product_count = request.products.len(),
        ingredient_count = available.len(),
        "Processing recipe request"
    );

    let candidates = state
        .generator
        .generate(&available)
        .await
        .map_err(ApiError::Upstream)?;

    let recipes = annotate(candidates, &available);

    Ok(Json(RecipesResponse {
        count: recipes.len(),
        recipes,
    }))
}

/// Start the HTTP server, blocking until shutdown.
///
/// Listens on the configured address and handles graceful shutdown on
/// Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = router(state, &config);

    info!(%addr, "Starting recipe suggestion server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
