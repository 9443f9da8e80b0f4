// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! HTTP surface over a shared [`ReviewAnalyzer`]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::api::{AnalysisResponse, HealthReport, HealthStatus, ModelInfo, ReviewAnalyzer};

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<ReviewAnalyzer>,
}

impl ApiState {
    pub fn new(analyzer: ReviewAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    /// Missing field deserializes to `null`
    #[serde(default)]
    review: Value,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/info", get(info))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: &str, state: ApiState) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Review server listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn predict(
    State(state): State<ApiState>,
    body: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> (StatusCode, Json<AnalysisResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected predict body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(AnalysisResponse::failure(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))),
            );
        }
    };

    // Inference is CPU bound
    let analyzer = Arc::clone(&state.analyzer);
    match tokio::task::spawn_blocking(move || analyzer.predict_value(&request.review)).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => {
            tracing::warn!("Prediction task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalysisResponse::failure(format!("Analysis failed: {}", err))),
            )
        }
    }
}

async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthReport>) {
    let analyzer = Arc::clone(&state.analyzer);
    let report = match tokio::task::spawn_blocking(move || analyzer.health_check()).await {
        Ok(report) => report,
        Err(err) => HealthReport {
            status: HealthStatus::Unhealthy,
            model_loaded: state.analyzer.hybrid().backend().is_loaded(),
            test_prediction: None,
            error: Some(format!("health check task failed: {}", err)),
        },
    };
    let code = match report.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(report))
}

async fn info(State(state): State<ApiState>) -> Json<ModelInfo> {
    Json(state.analyzer.get_model_info())
}
