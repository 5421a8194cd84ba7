//! Extraction options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for extracting a PDF into the record store.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to store image and figure payloads
    pub extract_images: bool,

    /// Whether to run the table detection pass
    pub extract_tables: bool,

    /// Table detection tuning
    pub table_config: TableDetectorConfig,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract text only (no images, no tables).
    pub fn text_only(mut self) -> Self {
        self.extract_images = false;
        self.extract_tables = false;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Set the table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extract_images: true,
            extract_tables: true,
            table_config: TableDetectorConfig::default(),
        }
    }
}
