//! Diagram generation core.
//!
//! ARCHITECTURE
//! ============
//! `sanitize` cleans the inbound description, `prompt` assembles the
//! two-message prompt, the backend produces raw text, and `validate` turns
//! that text into a [`ValidatedDiagram`] or a typed rejection. `pipeline`
//! composes the stages strictly in that order.

pub mod category;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
pub mod validate;

pub use error::PipelineError;
pub use pipeline::{DiagramPipeline, DiagramRequest, PipelineSettings};
pub use validate::ValidatedDiagram;
