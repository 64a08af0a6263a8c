//! Accepted diagram categories.
//!
//! Only the five keywords the validator recognizes are accepted. An unknown
//! category is rejected before any backend call so the caller learns about
//! it immediately instead of paying for a generation that cannot validate.

use std::fmt;

use super::error::PipelineError;

/// Category used when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "flowchart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramCategory {
    Graph,
    #[default]
    Flowchart,
    SequenceDiagram,
    ClassDiagram,
    StateDiagram,
}

impl DiagramCategory {
    pub const ALL: [Self; 5] =
        [Self::Graph, Self::Flowchart, Self::SequenceDiagram, Self::ClassDiagram, Self::StateDiagram];

    /// Parse a caller-supplied category. Surrounding whitespace is ignored,
    /// case is not.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] for anything but the five
    /// recognized keywords.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| PipelineError::invalid(format!("unsupported diagram category: {trimmed}")))
    }

    /// The keyword as substituted into the prompt.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Flowchart => "flowchart",
            Self::SequenceDiagram => "sequenceDiagram",
            Self::ClassDiagram => "classDiagram",
            Self::StateDiagram => "stateDiagram",
        }
    }
}

impl fmt::Display for DiagramCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
