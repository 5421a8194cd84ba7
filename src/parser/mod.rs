//! PDF parsing and extraction module.

mod element;
mod extractor;
mod layout;
mod options;
mod source;
mod table_detector;

pub use element::{declared_encoding, normalize_encoding, PageElement, XObjectStream};
pub use extractor::{extract, Diagnostic, ExtractionReport, PdfExtractor};
pub use layout::{Column, LayoutAnalyzer, TextBlock, TextLine, TextSpan};
pub use options::ExtractOptions;
pub use source::{read_version, PdfSource};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
