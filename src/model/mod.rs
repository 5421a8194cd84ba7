//! Data model shared by extraction, storage, and retrieval.
//!
//! Records are produced by the extractor, persisted by the store, and read
//! back by the retriever, which turns them into [`ContextFragment`]s.

mod exchange;
mod fragment;
mod record;

pub use exchange::Exchange;
pub use fragment::ContextFragment;
pub use record::{
    flatten_grid, ExtractedContent, ImageFormat, ImageRecord, TableGrid, TableRecord, TextRecord,
};
