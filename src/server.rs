use crate::analyzer::Analyzer;
use crate::error::AnalysisError;
use crate::results::{AnalysisRequest, AnalysisResponse};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub const SERVICE_NAME: &str = "EcoLens API";
pub const SERVICE_DESCRIPTION: &str = "API to analyze product sustainability.";

/// Body of every failed request
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    description: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    classifier: &'static str,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody {
            detail: self.detail(),
        }))
            .into_response()
    }
}

/// Build the HTTP router around a shared analyzer
///
/// CORS is wide open (any origin, method and header) for a trusted browser
/// extension client. Restrict it before exposing the service publicly.
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(cors)
        .with_state(analyzer)
}

/// Serve the router on an already-bound listener until the server exits
pub async fn serve(listener: TcpListener, analyzer: Arc<Analyzer>) -> std::io::Result<()> {
    axum::serve(listener, router(analyzer)).await
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        description: SERVICE_DESCRIPTION,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health(State(analyzer): State<Arc<Analyzer>>) -> (StatusCode, Json<Health>) {
    if analyzer.classifier_available() {
        (StatusCode::OK, Json(Health {
            status: "ok",
            classifier: "available",
        }))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(Health {
            status: "degraded",
            classifier: "unavailable",
        }))
    }
}

async fn analyze(
    State(analyzer): State<Arc<Analyzer>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisError> {
    let Json(request) = payload.map_err(|rejection| {
        ::log::warn!("Rejected analyze request body: {}", rejection.body_text());
        AnalysisError::Input(rejection.body_text())
    })?;

    let response = analyzer.analyze(&request).await?;
    Ok(Json(response))
}
