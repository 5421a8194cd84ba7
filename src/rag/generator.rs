//! Language model access.
//!
//! The model is an opaque capability: a [`Prompt`] goes in, text or an error
//! comes out. [`OllamaGenerator`] talks to an Ollama server over HTTP.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::prompt::Prompt;

/// Default Ollama server.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "mistral";

/// Something that turns a prompt into an answer.
pub trait Generator: Send + Sync {
    /// Generate a response for `prompt`.
    fn generate(&self, prompt: &Prompt) -> Result<String>;
}

/// Connection settings for [`OllamaGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Server base URL
    pub host: String,
    /// Model name
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Generator backed by an Ollama server (`POST /api/generate`).
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    /// Build the HTTP client. Fails if the config is unusable.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let host = config.host.trim_end_matches('/');
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(Error::GeneratorUnavailable(format!(
                "invalid host '{}'",
                config.host
            )));
        }
        if config.model.trim().is_empty() {
            return Err(Error::GeneratorUnavailable("empty model name".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::GeneratorUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", host),
            model: config.model,
        })
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the generate endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Generator for OllamaGenerator {
    fn generate(&self, prompt: &Prompt) -> Result<String> {
        let body = prompt.render();
        let request = GenerateRequest {
            model: &self.model,
            prompt: &body,
            stream: false,
        };

        log::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()?
            .error_for_status()?;

        let parsed: GenerateResponse = response.json()?;
        Ok(parsed.response.trim().to_string())
    }
}
