//! Prompt assembly.

use crate::model::{ContextFragment, Exchange};

/// Rendered when there is no prior exchange.
pub const NO_HISTORY: &str = "No history.";

/// Rendered when retrieval found nothing.
pub const NO_CONTEXT: &str = "No relevant information found in the database.";

const TEMPLATE_HEADER: &str = "You are a customer support assistant. Answer the user's question using only \
the provided context, rephrasing raw data into concise, conversational language. Use conversation \
history for follow-ups if relevant. If no answer is found in the context, politely state that the \
information is not available and suggest providing more details.";

/// The three inputs of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Rendered history lines
    pub history: String,
    /// Rendered context fragments
    pub context: String,
    /// The user's question
    pub query: String,
}

impl Prompt {
    /// Build a prompt from the last `history_turns` exchanges and the
    /// retrieved fragments.
    pub fn new(
        query: &str,
        fragments: &[ContextFragment],
        history: &[Exchange],
        history_turns: usize,
    ) -> Self {
        Self {
            history: render_history(history, history_turns),
            context: render_context(fragments),
            query: query.to_string(),
        }
    }

    /// The full prompt text sent to the model.
    pub fn render(&self) -> String {
        format!(
            "{}\n\nConversation History:\n{}\n\nCurrent Context:\n{}\n\nUser Query:\n{}\n\nResponse:",
            TEMPLATE_HEADER, self.history, self.context, self.query
        )
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// `Q: <query> A: <response>` lines for the last `turns` exchanges.
pub fn render_history(history: &[Exchange], turns: usize) -> String {
    let start = history.len().saturating_sub(turns);
    let recent = &history[start..];
    if recent.is_empty() {
        return NO_HISTORY.to_string();
    }
    recent
        .iter()
        .map(|e| format!("Q: {} A: {}", e.query, e.response))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per fragment, or [`NO_CONTEXT`].
pub fn render_context(fragments: &[ContextFragment]) -> String {
    if fragments.is_empty() {
        return NO_CONTEXT.to_string();
    }
    fragments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
