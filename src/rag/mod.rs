//! Retrieval-augmented answering.
//!
//! [`Retriever`] finds matching records, [`Prompt`] assembles them with the
//! conversation history, a [`Generator`] produces the answer, and
//! [`Orchestrator`] ties these together behind a [`ResponseCache`].

mod cache;
mod generator;
mod options;
mod orchestrator;
mod prompt;
mod retriever;

pub use cache::{cache_key, ResponseCache};
pub use generator::{Generator, GeneratorConfig, OllamaGenerator, DEFAULT_HOST, DEFAULT_MODEL};
pub use options::RagOptions;
pub use orchestrator::{Orchestrator, RagAnswer, Status, FAILURE_TEXT, UNAVAILABLE_TEXT};
pub use prompt::{render_context, render_history, Prompt, NO_CONTEXT, NO_HISTORY};
pub use retriever::{retrieve, tokenize, Retrieval, Retriever};
