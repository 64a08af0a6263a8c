//! Diagram generation route.
//!
//! The body is decoded in two ordered stages: bytes → JSON value
//! (`MalformedBody`), then JSON value → typed body (`InvalidInput`). Only a
//! well-formed request reaches the pipeline.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::diagram::{DiagramRequest, PipelineError};
use crate::error::ErrorCode;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateDiagramBody {
    #[serde(alias = "description")]
    pub prompt: String,
    #[serde(default, alias = "category")]
    pub diagram_type: Option<String>,
}

impl From<GenerateDiagramBody> for DiagramRequest {
    fn from(body: GenerateDiagramBody) -> Self {
        let request = DiagramRequest::new(body.prompt);
        match body.diagram_type {
            Some(category) => request.with_category(category),
            None => request,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateDiagramResponse {
    pub mermaid_syntax: String,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::Pipeline(PipelineError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::BackendFailure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "E_MALFORMED_BODY",
            Self::Pipeline(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Pipeline(e) if e.retryable())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "generate-diagram failed");
        } else {
            debug!(error = %self, code = self.error_code(), "generate-diagram rejected");
        }
        let body = json!({
            "detail": self.to_string(),
            "code": self.error_code(),
            "retryable": self.retryable(),
        });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// `POST /api/generate-diagram` — description in, validated markup out.
pub async fn generate_diagram(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateDiagramResponse>, ApiError> {
    let request = decode_body(&body)?;
    let diagram = state.pipeline.generate(&request).await?;
    Ok(Json(GenerateDiagramResponse { mermaid_syntax: diagram.into_string() }))
}

fn decode_body(bytes: &[u8]) -> Result<DiagramRequest, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    let body: GenerateDiagramBody = serde_json::from_value(value)
        .map_err(|e| PipelineError::InvalidInput(format!("invalid request body: {e}")))?;
    Ok(body.into())
}

#[cfg(test)]
#[path = "diagram_test.rs"]
mod tests;
