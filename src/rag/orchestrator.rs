//! Question answering over the record store.

use std::fmt;

use crate::error::Result;
use crate::model::Exchange;
use crate::store::Store;

use super::cache::{cache_key, ResponseCache};
use super::generator::{Generator, GeneratorConfig, OllamaGenerator};
use super::options::RagOptions;
use super::prompt::Prompt;
use super::retriever::Retriever;

/// Answer text when the generator could not be initialized.
pub const UNAVAILABLE_TEXT: &str = "Error: LLM unavailable.";

/// Answer text when generation failed.
pub const FAILURE_TEXT: &str = "Sorry, an error occurred while processing your query.";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Generated with at least one retrieved fragment
    Fetched,
    /// Generated without any retrieved fragment
    NoData,
    /// Served from the response cache
    Cached,
    /// The generator returned an error
    GenerationFailed,
    /// The generator was never initialized
    Unavailable,
}

impl Status {
    /// Message shown alongside the answer.
    pub fn message(&self) -> &'static str {
        match self {
            Status::Fetched => "Data successfully fetched from database.",
            Status::NoData => "No relevant data found in the database for this query.",
            Status::Cached => "Data fetched from cache.",
            Status::GenerationFailed => "LLM processing failed.",
            Status::Unavailable => "LLM initialization failed.",
        }
    }

    /// Whether the answer text came from the model.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Fetched | Status::NoData | Status::Cached)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// An answer and its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagAnswer {
    /// Answer text
    pub text: String,
    /// Where the answer came from
    pub status: Status,
}

impl RagAnswer {
    fn new(text: impl Into<String>, status: Status) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }
}

/// Retrieval-augmented answering: retrieve, build a prompt, generate, cache.
pub struct Orchestrator {
    generator: std::result::Result<Box<dyn Generator>, String>,
    retriever: Retriever,
    cache: ResponseCache,
    options: RagOptions,
}

impl Orchestrator {
    /// Create an orchestrator around an already constructed generator.
    ///
    /// An `Err` generator is kept: every answer then reports
    /// [`Status::Unavailable`].
    pub fn new(generator: Result<Box<dyn Generator>>, options: RagOptions) -> Self {
        let generator = generator.map_err(|e| {
            log::error!("LLM initialization failed: {}", e);
            e.to_string()
        });
        Self {
            generator,
            retriever: Retriever::new(&options),
            cache: ResponseCache::new(options.cache_capacity, options.cache_ttl),
            options,
        }
    }

    /// Create an orchestrator backed by an Ollama server.
    pub fn with_ollama(config: GeneratorConfig, options: RagOptions) -> Self {
        let generator =
            OllamaGenerator::new(config).map(|g| Box::new(g) as Box<dyn Generator>);
        Self::new(generator, options)
    }

    /// Whether the generator initialized.
    pub fn is_available(&self) -> bool {
        self.generator.is_ok()
    }

    /// The response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// The options in use.
    pub fn options(&self) -> &RagOptions {
        &self.options
    }

    /// Answer `query` from the store contents and recent history.
    ///
    /// Never fails: problems are reported through [`RagAnswer::status`].
    pub fn answer(&self, query: &str, store: &Store, history: &[Exchange]) -> RagAnswer {
        let generator = match &self.generator {
            Ok(generator) => generator,
            Err(_) => return RagAnswer::new(UNAVAILABLE_TEXT, Status::Unavailable),
        };

        let fragments = self.retriever.retrieve(query, store);
        let status = if fragments.is_empty() {
            Status::NoData
        } else {
            Status::Fetched
        };

        let key = cache_key(query, &fragments, self.options.cache_key_chars);
        if let Some(text) = self.cache.get(&key) {
            log::debug!("Cache hit for '{}'", query);
            return RagAnswer::new(text, Status::Cached);
        }

        let prompt = Prompt::new(query, &fragments, history, self.options.history_turns);
        match generator.generate(&prompt) {
            Ok(text) => {
                self.cache.insert(key, text.clone());
                log::info!(
                    "Answered '{}' with {} fragments",
                    query,
                    fragments.len()
                );
                RagAnswer::new(text, status)
            }
            Err(e) => {
                log::error!("LLM processing failed: {}", e);
                RagAnswer::new(FAILURE_TEXT, Status::GenerationFailed)
            }
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("available", &self.is_available())
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish()
    }
}
