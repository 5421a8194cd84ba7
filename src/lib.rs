//! # pdfchat
//!
//! Ask questions about a PDF document.
//!
//! The library extracts text blocks, images, and tables from a PDF into a
//! local SQLite store, retrieves records that lexically match a question,
//! and hands them with the recent conversation to a language model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfchat::{Orchestrator, GeneratorConfig, RagOptions, Store};
//!
//! fn main() -> pdfchat::Result<()> {
//!     let mut store = Store::open("extracted_data.db")?;
//!     pdfchat::extract_file("manual.pdf", &mut store)?;
//!
//!     let orchestrator = Orchestrator::with_ollama(GeneratorConfig::default(), RagOptions::default());
//!     let answer = orchestrator.answer("What is the cable weight?", &store, &[]);
//!     println!("{} ({})", answer.text, answer.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Full-replace extraction**: each run rewrites the store in one transaction
//! - **Layout-aware text**: spans grouped into lines and column-aware blocks
//! - **Table detection**: alignment-based, no ruling lines required
//! - **Response cache**: LRU with a fixed time-to-live

pub mod error;
pub mod model;
pub mod parser;
pub mod rag;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    ContextFragment, Exchange, ExtractedContent, ImageFormat, ImageRecord, TableGrid, TableRecord,
    TextRecord,
};
pub use parser::{extract, Diagnostic, ExtractOptions, ExtractionReport, PdfExtractor, PdfSource};
pub use rag::{
    retrieve, Generator, GeneratorConfig, OllamaGenerator, Orchestrator, Prompt, RagAnswer,
    RagOptions, Status,
};
pub use store::{RecordCounts, Store, DEFAULT_DB_PATH};

use std::path::{Path, PathBuf};

/// Extract a PDF file into the store, replacing its contents.
///
/// # Example
///
/// ```no_run
/// use pdfchat::{extract_file, Store};
///
/// let mut store = Store::open_in_memory().unwrap();
/// let report = extract_file("document.pdf", &mut store).unwrap();
/// println!("{} text blocks", report.counts.texts);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, store: &mut Store) -> Result<ExtractionReport> {
    PdfExtractor::new(path.as_ref()).run(store)
}

/// Extract a PDF held in memory into the store, replacing its contents.
pub fn extract_bytes(data: Vec<u8>, store: &mut Store) -> Result<ExtractionReport> {
    PdfExtractor::new(data).run(store)
}

/// Extract with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfchat::{extract_with_options, ExtractOptions, Store};
///
/// let mut store = Store::open_in_memory().unwrap();
/// let options = ExtractOptions::new().text_only();
/// extract_with_options("document.pdf", &mut store, options).unwrap();
/// ```
pub fn extract_with_options(
    source: impl Into<PdfSource>,
    store: &mut Store,
    options: ExtractOptions,
) -> Result<ExtractionReport> {
    PdfExtractor::with_options(source, options).run(store)
}

/// Builder tying a store file, extraction options, and a language model together.
///
/// # Example
///
/// ```no_run
/// use pdfchat::PdfChat;
///
/// let chat = PdfChat::new()
///     .with_db("manual.db")
///     .with_model("mistral");
/// chat.extract("manual.pdf")?;
/// let answer = chat.ask("Which voltage rating applies?", &[])?;
/// println!("{}", answer.text);
/// # Ok::<(), pdfchat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PdfChat {
    db_path: PathBuf,
    extract_options: ExtractOptions,
    rag_options: RagOptions,
    generator_config: GeneratorConfig,
}

impl PdfChat {
    /// Create a builder using the default store file and model.
    pub fn new() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            extract_options: ExtractOptions::default(),
            rag_options: RagOptions::default(),
            generator_config: GeneratorConfig::default(),
        }
    }

    /// Set the store file.
    pub fn with_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set retrieval and cache options.
    pub fn with_rag_options(mut self, options: RagOptions) -> Self {
        self.rag_options = options;
        self
    }

    /// Set the generator configuration.
    pub fn with_generator(mut self, config: GeneratorConfig) -> Self {
        self.generator_config = config;
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.generator_config = self.generator_config.with_model(model);
        self
    }

    /// The store file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open the store.
    pub fn open_store(&self) -> Result<Store> {
        Store::open(&self.db_path)
    }

    /// Extract a PDF into the store.
    pub fn extract(&self, source: impl Into<PdfSource>) -> Result<ExtractionReport> {
        let mut store = self.open_store()?;
        PdfExtractor::with_options(source, self.extract_options.clone()).run(&mut store)
    }

    /// Build an orchestrator for this configuration.
    ///
    /// Keep it around across questions so its cache is reused.
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::with_ollama(self.generator_config.clone(), self.rag_options.clone())
    }

    /// Answer a single question with a fresh orchestrator.
    pub fn ask(&self, query: &str, history: &[Exchange]) -> Result<RagAnswer> {
        let store = self.open_store()?;
        Ok(self.orchestrator().answer(query, &store, history))
    }
}

impl Default for PdfChat {
    fn default() -> Self {
        Self::new()
    }
}
