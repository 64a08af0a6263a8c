//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! only holds the pipeline, which carries no per-request state of its own.

use std::sync::Arc;

use crate::diagram::DiagramPipeline;

/// Clone is required by Axum; the pipeline is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DiagramPipeline>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: DiagramPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
