//! Pipeline failure taxonomy.

use crate::error::ErrorCode;
use crate::llm::types::LlmError;

/// Why a diagram could not be produced.
///
/// `InvalidInput` is caller-correctable; `BackendFailure` is everything the
/// text-generation call can go wrong with. Neither is retried.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    BackendFailure(#[from] LlmError),
}

impl PipelineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::BackendFailure(_) => "E_BACKEND_FAILURE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::BackendFailure(e) if e.retryable())
    }
}
