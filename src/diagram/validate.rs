//! Output validation.
//!
//! The backend is free-form; this module is where its text either becomes a
//! [`ValidatedDiagram`] or is rejected. Only the leading keyword is checked.
//! Node structure, bracket balance and references are left to the renderer.

use std::fmt;

use serde::Serialize;

use super::error::PipelineError;

/// Keywords a diagram must start with.
pub const RECOGNIZED_KEYWORDS: [&str; 5] = ["graph", "flowchart", "sequenceDiagram", "classDiagram", "stateDiagram"];

/// Rejection message for output without a recognized leading keyword.
pub const INVALID_SYNTAX_MESSAGE: &str = "Output must be valid Mermaid syntax";

const MERMAID_FENCE: &str = "```mermaid";
const FENCE: &str = "```";

/// Straight and curly quotes; the last four are U+2018, U+2019, U+201C, U+201D.
const QUOTES: [char; 6] = ['"', '\'', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Markup that passed validation: no fence markers, no quote characters, and
/// a recognized leading keyword. Only [`validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedDiagram(String);

impl ValidatedDiagram {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The recognized keyword the markup starts with.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        leading_keyword(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for ValidatedDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip formatting artifacts from raw backend output and check its keyword.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] with [`INVALID_SYNTAX_MESSAGE`]
/// when the cleaned text does not start with a recognized keyword.
pub fn validate(raw: &str) -> Result<ValidatedDiagram, PipelineError> {
    let text = clean(raw);
    if leading_keyword(&text).is_none() {
        return Err(PipelineError::invalid(INVALID_SYNTAX_MESSAGE));
    }
    Ok(ValidatedDiagram(text))
}

/// Fences out, trim, quotes out, trim; repeated until nothing changes,
/// since removing a quote can join backticks into a new fence.
///
/// The trim after quote removal means a quote (plus whitespace) in front of
/// the keyword is accepted: `"\" flowchart TD"` cleans to `flowchart TD`.
/// Without it, cleaning its own output could change it again.
fn clean(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let unfenced = current.replace(MERMAID_FENCE, "").replace(FENCE, "");
        let unquoted: String = unfenced.trim().chars().filter(|c| !QUOTES.contains(c)).collect();
        let next = unquoted.trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn leading_keyword(text: &str) -> Option<&'static str> {
    RECOGNIZED_KEYWORDS
        .into_iter()
        .find(|keyword| text.starts_with(keyword))
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
