use crate::client::{PERFORMANCE_CATEGORY, PageSpeedClient};
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::extract::{Extractor, ExtractorOptions};
use crate::results::AnalysisReport;
use crate::validate::AnalysisRequest;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

pub const INVALID_BODY_MESSAGE: &str = "Corpo da requisição inválido.";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Validation(message) => ::log::debug!("Rejected request: {}", message),
            Error::Unexpected(detail) => ::log::error!("Unexpected failure: {}", detail),
            other => ::log::error!("Analysis failed: {}", other),
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// How an endpoint validates requests and shapes its results
#[derive(Debug, Clone, Copy)]
struct AnalysisPath {
    /// Validate the email on the server, not just on the client
    check_email: bool,
    /// Ask the analyzer for the performance category only
    performance_only: bool,
    extractor: Extractor,
}

impl AnalysisPath {
    fn full() -> Self {
        Self {
            check_email: true,
            performance_only: true,
            extractor: Extractor::new(ExtractorOptions::full()),
        }
    }

    fn basic() -> Self {
        Self {
            check_email: false,
            performance_only: false,
            extractor: Extractor::new(ExtractorOptions::basic()),
        }
    }
}

/// Shared state of the report server
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    fn client(&self, path: &AnalysisPath) -> Result<PageSpeedClient> {
        let api_key = self.config.require_api_key()?;
        let client = PageSpeedClient::new(self.config.api_endpoint.clone(), api_key)
            .with_http_client(self.http.clone());

        Ok(if path.performance_only {
            client.with_category(PERFORMANCE_CATEGORY)
        } else {
            client
        })
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_full))
        .route("/api/pagespeed", post(analyze_basic))
        .route("/healthz", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze_full(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>> {
    analyze(state, payload, AnalysisPath::full()).await
}

async fn analyze_basic(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>> {
    analyze(state, payload, AnalysisPath::basic()).await
}

async fn analyze(
    state: AppState,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
    path: AnalysisPath,
) -> Result<Json<AnalysisReport>> {
    let Json(request) = payload.map_err(|rejection| {
        ::log::debug!("Invalid request body: {}", rejection);
        Error::Validation(INVALID_BODY_MESSAGE.to_string())
    })?;

    let url = request.validated_url()?.to_string();
    if path.check_email {
        request.validate_email()?;
    }

    let client = state.client(&path)?;
    let extractor = path.extractor;

    let report = run_isolated(async move { client.analyze(&url, &extractor).await }).await?;

    Ok(Json(report))
}

/// Run an analysis on its own task so a panic becomes an error response
async fn run_isolated<T, F>(analysis: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(analysis)
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))?
}

/// Bind the configured address and serve until Ctrl-C
pub async fn run_server(config: ServerConfig) -> Result<()> {
    if config.api_key.is_none() {
        ::log::warn!("No API key configured; analysis requests will fail until one is set");
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str()).await?;
    ::log::info!("Report server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(config)))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            ::log::info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
