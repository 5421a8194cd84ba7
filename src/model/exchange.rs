//! Conversation history entries.

use serde::{Deserialize, Serialize};

/// One question/answer turn of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// The user's question
    pub query: String,

    /// The answer that was shown
    pub response: String,
}

impl Exchange {
    /// Create a new exchange.
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
        }
    }
}
