//! HTTP transport for the prediction service.
//!
//! | Method | Path                        | Success                         |
//! |--------|-----------------------------|---------------------------------|
//! | POST   | `/predict`                  | 200 `{input, result}` (sync) or 202 `{message, prediction_id}` (async) |
//! | GET    | `/predict/:prediction_id`   | 200 `{prediction_id, output}`   |
//! | GET    | `/openapi.json`             | 200 OpenAPI document            |
//! | GET    | `/swagger`                  | 200 Swagger UI page             |
//! | GET    | `/api/stats`                | 200 queue and job counts        |
//!
//! The `Async-Mode` request header selects the mode; see
//! [`SubmitMode::parse_flag`] for the accepted values. Errors are returned as
//! `{"error": "..."}`.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{PredictError, Result};
use crate::scheduler::{JobCoordinator, SubmitMode, SubmitOutcome};

pub const ASYNC_MODE_HEADER: &str = "Async-Mode";

#[derive(Clone)]
pub struct ApiState {
    pub coordinator: JobCoordinator,
    pub worker_count: usize,
}

#[derive(Deserialize)]
struct PredictionRequest {
    input: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct StatsResponse {
    queued: usize,
    pending: usize,
    ready: usize,
    failed: usize,
    workers: usize,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict_handler))
        .route("/predict/:prediction_id", get(prediction_result_handler))
        .route("/openapi.json", get(openapi_handler))
        .route("/swagger", get(swagger_handler))
        .route("/api/stats", get(stats_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the API until `shutdown` is cancelled.
pub async fn run_api(
    addr: SocketAddr,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = router(state);

    tracing::info!(addr = %addr, "Starting prediction API server");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(addr = %addr, error = %e, "Failed to bind API server");
        e
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Prediction API server stopped");
    Ok(())
}

async fn predict_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (input, mode) = match parse_submission(&headers, &body) {
        Ok(parsed) => parsed,
        Err(e) => return e.into_response(),
    };

    match state.coordinator.submit(input, mode).await {
        Ok(SubmitOutcome::Completed(prediction)) => {
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Ok(SubmitOutcome::Accepted(accepted)) => {
            (StatusCode::ACCEPTED, Json(accepted)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn prediction_result_handler(
    State(state): State<ApiState>,
    Path(prediction_id): Path<String>,
) -> Response {
    match state.coordinator.poll(&prediction_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn openapi_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        include_str!("openapi.json"),
    )
}

async fn swagger_handler() -> Html<&'static str> {
    Html(include_str!("swagger.html"))
}

async fn stats_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let counts = state.coordinator.job_counts().await;
    Json(StatsResponse {
        queued: state.coordinator.queued_tasks(),
        pending: counts.pending,
        ready: counts.ready,
        failed: counts.failed,
        workers: state.worker_count,
    })
}

/// Turn the raw request into a validated input and an explicit mode.
fn parse_submission(headers: &HeaderMap, body: &[u8]) -> Result<(String, SubmitMode)> {
    let mode = match headers.get(ASYNC_MODE_HEADER) {
        None => SubmitMode::Sync,
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                PredictError::Validation(format!(
                    "{} header is not valid text",
                    ASYNC_MODE_HEADER
                ))
            })?;
            SubmitMode::parse_flag(value)?
        }
    };

    if body.is_empty() {
        return Err(PredictError::Validation("request body is required".to_string()));
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| PredictError::Validation(format!("malformed JSON body: {}", e)))?;
    if !value.is_object() {
        return Err(PredictError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }
    let request: PredictionRequest = serde_json::from_value(value)
        .map_err(|e| PredictError::Validation(format!("malformed request: {}", e)))?;

    let input = match request.input {
        None | Some(serde_json::Value::Null) => {
            return Err(PredictError::Validation(
                "missing required field 'input'".to_string(),
            ))
        }
        Some(serde_json::Value::String(input)) => input,
        Some(_) => {
            return Err(PredictError::Validation(
                "field 'input' must be a string".to_string(),
            ))
        }
    };

    Ok((input, mode))
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PredictError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            PredictError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Prediction ID not found".to_string())
            }
            PredictError::NotReady(_) => (
                StatusCode::BAD_REQUEST,
                "Prediction is still being processed.".to_string(),
            ),
            PredictError::PredictionFailed(_) | PredictError::ComputeFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            PredictError::ShuttingDown => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            PredictError::AlreadyExists(_)
            | PredictError::InternalInconsistency(_)
            | PredictError::Config(_)
            | PredictError::Io(_) => {
                tracing::error!(error = %self, "Internal error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
