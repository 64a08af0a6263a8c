//! Prompt assembly.

use crate::llm::types::Message;

/// Fixed system instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert at generating Mermaid diagram syntax. Always respond ONLY with valid Mermaid syntax.
For flowcharts, use TD (top-down) direction and include clear node descriptions.
Use appropriate shapes for different node types:
- [] for process steps
- {} for decision points
- () for start/end points
Never include any explanations or markdown, only the Mermaid syntax.";

/// The two-message prompt for one generation: system first, human second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    messages: [Message; 2],
}

impl PromptDocument {
    #[must_use]
    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    #[must_use]
    pub fn human(&self) -> &Message {
        &self.messages[1]
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Build the prompt. Both values are substituted verbatim.
#[must_use]
pub fn build_prompt(sanitized_description: &str, category: &str) -> PromptDocument {
    let human = format!("Generate a {category} diagram for the following description: {sanitized_description}");
    PromptDocument { messages: [Message::system(SYSTEM_INSTRUCTION), Message::user(human)] }
}
