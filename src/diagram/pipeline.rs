//! Diagram pipeline — sanitize → prompt → backend → validate.
//!
//! DESIGN
//! ======
//! One `generate` call is one independent exchange. The pipeline holds only
//! the backend handle and immutable settings, so concurrent requests share
//! nothing mutable. Every failure is terminal for the request: there is no
//! retry and no partial output.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::category::{DEFAULT_CATEGORY, DiagramCategory};
use super::error::PipelineError;
use super::prompt::build_prompt;
use super::sanitize::sanitize;
use super::ValidatedDiagram;
use super::validate::validate;
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::LlmError;

pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 8000;

// =============================================================================
// TYPES
// =============================================================================

/// A caller's request: free-form description plus the diagram category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub description: String,
    pub category: String,
}

impl DiagramRequest {
    /// A request for the default category.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), category: DEFAULT_CATEGORY.to_string() }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Upper bound on the sanitized description, in characters.
    pub max_description_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { max_description_chars: DEFAULT_MAX_DESCRIPTION_CHARS }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct DiagramPipeline {
    llm: Arc<dyn LlmChat>,
    settings: PipelineSettings,
}

impl DiagramPipeline {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, settings: PipelineSettings) -> Self {
        Self { llm, settings }
    }

    /// Turn a description into validated diagram markup.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] for an unsupported category, an empty
    /// or oversized description, or backend output that fails validation.
    /// [`PipelineError::BackendFailure`] when the backend call fails or
    /// returns no text.
    pub async fn generate(&self, request: &DiagramRequest) -> Result<ValidatedDiagram, PipelineError> {
        let request_id = Uuid::new_v4();
        let category = DiagramCategory::parse(&request.category)?;
        let description = sanitize(&request.description);
        check_description(&description, self.settings.max_description_chars)?;

        info!(%request_id, %category, description_len = description.len(), "diagram: request received");

        let prompt = build_prompt(&description, category.as_str());
        debug!(
            %request_id,
            system_len = prompt.system().content.len(),
            human_len = prompt.human().content.len(),
            "diagram: prompt built"
        );
        let started = Instant::now();
        let response = self.llm.chat(prompt.messages()).await.inspect_err(|e| {
            warn!(%request_id, error = %e, code = e.error_code(), retryable = e.retryable(), "diagram: backend call failed");
        })?;

        info!(
            %request_id,
            model = %response.model,
            stop_reason = %response.stop_reason,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "diagram: backend responded"
        );

        let raw = response.text().ok_or(LlmError::EmptyResponse)?;
        let diagram = validate(&raw).inspect_err(|e| {
            warn!(%request_id, error = %e, raw_len = raw.len(), "diagram: output rejected");
        })?;

        info!(%request_id, keyword = diagram.keyword(), len = diagram.as_str().len(), "diagram: generated");
        Ok(diagram)
    }
}

fn check_description(description: &str, max_chars: usize) -> Result<(), PipelineError> {
    if description.trim().is_empty() {
        return Err(PipelineError::invalid("description must not be empty"));
    }
    let len = description.chars().count();
    if len > max_chars {
        return Err(PipelineError::invalid(format!(
            "description too long: {len} characters (max {max_chars})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
