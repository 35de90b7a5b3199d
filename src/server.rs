//! HTTP boundary.
//!
//! Exposes the analysis pipeline as a small JSON API for the browser
//! front end.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/analyze` | Run the pipeline for `{"prompt": "Rapid - FCSB"}` |
//! | `OPTIONS` | `/analyze` | CORS preflight, always 200 |
//! | `GET` | `/health` | Health check (returns version) |
//!
//! Any other method on `/analyze` is answered with `405`.
//!
//! # Response Contract
//!
//! Success: `200 {"reply": "...", "success": true}`.
//! Invalid input: `400 {"error": "...", "success": false}` with a Romanian
//! corrective message. Generation failure: `500` with the same error
//! shape; an invalid credential is distinguished from generic provider
//! failure.
//!
//! # CORS
//!
//! Any origin is allowed; methods are limited to POST/OPTIONS and headers
//! to `content-type`, which is all the front end needs.

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::completion::CompletionError;
use crate::config::Config;
use crate::orchestrate::{AnalyzeError, Orchestrator};

/// Shared application state passed to route handlers.
#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Start the HTTP server on the configured bind address.
///
/// The orchestrator is constructed once by the caller and reused read-only
/// across requests. Runs until the process is terminated.
pub async fn run_server(config: &Config, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let state = AppState { orchestrator };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/analyze", post(handle_analyze).options(handle_preflight))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    info!(bind = %config.server.bind, "matchdesk listening");

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Request / response bodies ============

#[derive(Deserialize)]
struct AnalyzeRequest {
    /// Free-text match description. Missing field is treated like an empty
    /// prompt so the caller gets the corrective message, not a decode error.
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    reply: String,
    success: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    success: bool,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            success: false,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn server_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

/// Map pipeline failures to status codes and user-facing messages.
/// Invalid input is the caller's problem; everything else is ours.
fn classify_analyze_error(err: AnalyzeError) -> AppError {
    match err {
        AnalyzeError::InvalidInput(message) => bad_request(message),
        AnalyzeError::Generation(CompletionError::Auth) => {
            server_error("Cheia API pentru generarea analizei este invalida sau lipseste")
        }
        AnalyzeError::Generation(inner) => {
            server_error(format!("Generarea analizei a esuat: {}", inner))
        }
    }
}

// ============ Handlers ============

async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let prompt = request.prompt.unwrap_or_default();

    let analysis = state
        .orchestrator
        .analyze(&prompt)
        .await
        .map_err(classify_analyze_error)?;

    debug!(synthetic = analysis.synthetic, "reply ready");

    Ok(Json(AnalyzeResponse {
        reply: analysis.reply,
        success: true,
    }))
}

/// The front end sends a bare preflight before POSTing; answer 200 and let
/// the CORS layer attach the allow headers.
async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
