//! PDF extraction into the record store.
//!
//! A run makes two independent passes over the document:
//!
//! 1. **Elements**: each page's content stream is classified into
//!    [`PageElement`]s; text regions become [`TextRecord`]s and image or
//!    figure XObjects become [`ImageRecord`]s.
//! 2. **Tables**: the text spans of each page are re-extracted and handed to
//!    the [`TableDetector`]; every non-empty grid becomes a [`TableRecord`].
//!
//! Problems with a single page or element are collected as [`Diagnostic`]s
//! and never abort the run. The collected records then replace the store
//! contents in one transaction.

use std::fmt;

use crate::error::Result;
use crate::model::{ExtractedContent, ImageRecord, TableRecord, TextRecord};
use crate::store::{RecordCounts, Store};

use super::element::{PageElement, XObjectStream};
use super::layout::LayoutAnalyzer;
use super::options::ExtractOptions;
use super::source::PdfSource;
use super::table_detector::TableDetector;

/// A recoverable problem met while extracting one page or element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Page the problem belongs to, if any
    pub page: Option<u32>,
    /// Description
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic for a page.
    pub fn on_page(page: u32, message: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "page {}: {}", page, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Summary of a completed extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of pages walked
    pub pages: u32,
    /// Records written per collection
    pub counts: RecordCounts,
    /// Skipped pages and elements
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts text, images, and tables from one PDF.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    source: PdfSource,
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Create an extractor with default options.
    pub fn new(source: impl Into<PdfSource>) -> Self {
        Self::with_options(source, ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(source: impl Into<PdfSource>, options: ExtractOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }

    /// The source being extracted.
    pub fn source(&self) -> &PdfSource {
        &self.source
    }

    /// Walk the document and collect records without touching a store.
    pub fn collect(&self) -> Result<(ExtractedContent, Vec<Diagnostic>)> {
        let (_, content, diagnostics) = self.walk()?;
        Ok((content, diagnostics))
    }

    fn walk(&self) -> Result<(u32, ExtractedContent, Vec<Diagnostic>)> {
        let doc = self.source.load()?;
        let analyzer = LayoutAnalyzer::new(&doc);
        let pages = analyzer.page_numbers();

        let mut content = ExtractedContent::new();
        let mut diagnostics = Vec::new();

        self.element_pass(&analyzer, &pages, &mut content, &mut diagnostics);
        if self.options.extract_tables {
            self.table_pass(&analyzer, &pages, &mut content, &mut diagnostics);
        }

        Ok((pages.len() as u32, content, diagnostics))
    }

    /// Extract the document and replace the store contents with the result.
    pub fn run(&self, store: &mut Store) -> Result<ExtractionReport> {
        let (pages, content, diagnostics) = self.walk()?;

        for diagnostic in &diagnostics {
            log::warn!("Skipped during extraction of {}: {}", self.source.label(), diagnostic);
        }

        store.replace_all(&content)?;

        let counts = RecordCounts {
            texts: content.texts.len(),
            images: content.images.len(),
            tables: content.tables.len(),
        };
        log::info!(
            "Extracted {}: {} pages, {} texts, {} images, {} tables ({} skipped)",
            self.source.label(),
            pages,
            counts.texts,
            counts.images,
            counts.tables,
            diagnostics.len()
        );

        Ok(ExtractionReport {
            pages,
            counts,
            diagnostics,
        })
    }

    fn element_pass(
        &self,
        analyzer: &LayoutAnalyzer<'_>,
        pages: &[u32],
        content: &mut ExtractedContent,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut image_counter = 0usize;

        for &page in pages {
            let elements = match analyzer.page_elements(page) {
                Ok(elements) => elements,
                Err(e) => {
                    diagnostics.push(Diagnostic::on_page(page, e.to_string()));
                    continue;
                }
            };

            for element in elements {
                match element {
                    PageElement::TextRegion(text) => {
                        let text = text.trim();
                        if !text.is_empty() {
                            content.texts.push(TextRecord::new(page, text));
                        }
                    }
                    PageElement::ImageRegion(xobject) | PageElement::FigureRegion(xobject) => {
                        if !self.options.extract_images {
                            continue;
                        }
                        match read_image(&xobject, page, image_counter) {
                            Ok(record) => {
                                image_counter += 1;
                                content.images.push(record);
                            }
                            Err(diagnostic) => diagnostics.push(diagnostic),
                        }
                    }
                    PageElement::Other(description) => {
                        log::debug!("Page {}: ignoring {}", page, description);
                    }
                }
            }
        }
    }

    fn table_pass(
        &self,
        analyzer: &LayoutAnalyzer<'_>,
        pages: &[u32],
        content: &mut ExtractedContent,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let detector = TableDetector::with_config(self.options.table_config.clone());

        for &page in pages {
            let spans = match analyzer.extract_page_spans(page) {
                Ok(spans) => spans,
                Err(e) => {
                    diagnostics.push(Diagnostic::on_page(page, format!("tables: {}", e)));
                    continue;
                }
            };

            let mut table_index = 0u32;
            for grid in detector.detect_grids(&spans) {
                match TableRecord::from_grid(page, table_index, &grid) {
                    Ok(record) => {
                        table_index += 1;
                        content.tables.push(record);
                    }
                    Err(e) => diagnostics.push(Diagnostic::on_page(page, e.to_string())),
                }
            }
        }
    }
}

fn read_image(
    xobject: &XObjectStream<'_>,
    page: u32,
    counter: usize,
) -> std::result::Result<ImageRecord, Diagnostic> {
    xobject
        .read()
        .map(|(format, data)| ImageRecord::new(counter, format, data))
        .map_err(|e| Diagnostic::on_page(page, e.to_string()))
}

/// Extract a PDF into the store, replacing its contents.
///
/// Returns `false` when the document cannot be opened or the store write
/// fails; skipped pages and elements are only logged.
pub fn extract(source: impl Into<PdfSource>, store: &mut Store) -> bool {
    let extractor = PdfExtractor::new(source);
    match extractor.run(store) {
        Ok(_) => true,
        Err(e) => {
            log::error!("Extraction of {} failed: {}", extractor.source().label(), e);
            false
        }
    }
}
