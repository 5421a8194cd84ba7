//! Lexical retrieval over stored records.
//!
//! A query is split into lower-cased tokens. Text blocks, flattened tables,
//! and image names are scanned in that order for substring matches; every
//! match becomes a [`ContextFragment`]. There is no ranking: fragments come
//! back in storage order within each scan, and a text block matching several
//! tokens is returned once per token.

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::ContextFragment;
use crate::store::Store;

use super::options::RagOptions;

/// Fragments found for a query, plus the records that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Matches in scan order
    pub fragments: Vec<ContextFragment>,
    /// Records skipped because they could not be decoded
    pub skipped: Vec<String>,
}

/// Scans a [`Store`] for records matching a query.
#[derive(Debug, Clone)]
pub struct Retriever {
    snippet_chars: usize,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(&RagOptions::default())
    }
}

impl Retriever {
    /// Create a retriever using the snippet limit from `options`.
    pub fn new(options: &RagOptions) -> Self {
        Self {
            snippet_chars: options.snippet_chars,
        }
    }

    /// Retrieve fragments, returning an empty list if the store fails.
    pub fn retrieve(&self, query: &str, store: &Store) -> Vec<ContextFragment> {
        match self.try_retrieve(query, store) {
            Ok(retrieval) => {
                for skipped in &retrieval.skipped {
                    log::warn!("Retrieval skipped {}", skipped);
                }
                retrieval.fragments
            }
            Err(e) => {
                log::error!("Retrieval failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Retrieve fragments, propagating store errors.
    pub fn try_retrieve(&self, query: &str, store: &Store) -> Result<Retrieval> {
        let tokens = tokenize(query);
        let mut retrieval = Retrieval::default();
        if tokens.is_empty() {
            return Ok(retrieval);
        }

        let texts = store.texts()?;
        let folded: Vec<String> = texts.iter().map(|t| fold(&t.content)).collect();
        for token in &tokens {
            for (record, haystack) in texts.iter().zip(&folded) {
                if haystack.contains(token.as_str()) {
                    retrieval.fragments.push(ContextFragment::Text {
                        page: record.page_number,
                        content: truncate_chars(&record.content, self.snippet_chars),
                    });
                }
            }
        }

        for table in store.tables()? {
            let flattened = match table.flattened() {
                Ok(text) => text,
                Err(e) => {
                    retrieval.skipped.push(format!(
                        "table {} on page {}: {}",
                        table.table_index, table.page_number, e
                    ));
                    continue;
                }
            };
            if matches_any(&fold(&flattened), &tokens) {
                retrieval.fragments.push(ContextFragment::Table {
                    page: table.page_number,
                    index: table.table_index,
                    content: truncate_chars(&flattened, self.snippet_chars),
                });
            }
        }

        for image in store.image_entries()? {
            if matches_any(&fold(&image.name), &tokens) {
                retrieval.fragments.push(ContextFragment::Image {
                    name: image.name,
                    format: image.format,
                });
            }
        }

        log::debug!(
            "Retrieved {} fragments for {} tokens",
            retrieval.fragments.len(),
            tokens.len()
        );
        Ok(retrieval)
    }
}

/// Retrieve fragments with default options.
pub fn retrieve(query: &str, store: &Store) -> Vec<ContextFragment> {
    Retriever::default().retrieve(query, store)
}

/// Split a query into distinct, lower-cased tokens in query order.
///
/// Leading and trailing punctuation is stripped; tokens left empty are
/// dropped.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in fold(query).split_whitespace() {
        let token = word.trim_matches(|c: char| !c.is_alphanumeric());
        if !token.is_empty() && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn matches_any(haystack: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|token| haystack.contains(token.as_str()))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFormat, ImageRecord, TableRecord, TextRecord};

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Cable  WEIGHT cable"), vec!["cable", "weight"]);
        assert_eq!(tokenize("What is the weight?"), vec!["what", "is", "the", "weight"]);
        assert_eq!(tokenize("\"0.6/1kV\","), vec!["0.6/1kv"]);
        assert!(tokenize("?!  ...").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_fold_ligatures() {
        assert_eq!(fold("Eﬁcient"), "eficient");
        assert_eq!(tokenize("ＦＵＬＬ"), vec!["full"]);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("한국어입니다", 3), "한국어");
    }

    #[test]
    fn test_text_block_emitted_once_per_token() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_text(&TextRecord::new(1, "Copper conductor, copper screen"))
            .unwrap();
        store.insert_text(&TextRecord::new(2, "PVC sheath")).unwrap();

        let fragments = retrieve("copper screen", &store);
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().all(|f| f.page() == Some(1)));
    }

    #[test]
    fn test_malformed_table_is_skipped() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_table(&TableRecord {
                page_number: 1,
                table_index: 0,
                content: "not json".to_string(),
            })
            .unwrap();
        store
            .insert_image(&ImageRecord::new(0, ImageFormat::Jpeg, vec![1]))
            .unwrap();

        let retrieval = Retriever::default().try_retrieve("image json", &store).unwrap();
        assert_eq!(retrieval.skipped.len(), 1);
        assert_eq!(
            retrieval.fragments,
            vec![ContextFragment::Image {
                name: "image_0.jpg".to_string(),
                format: ImageFormat::Jpeg
            }]
        );
    }

    #[test]
    fn test_snippet_limit() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_text(&TextRecord::new(1, "x".repeat(600)))
            .unwrap();

        let fragments = retrieve("xxx", &store);
        match &fragments[0] {
            ContextFragment::Text { content, .. } => assert_eq!(content.chars().count(), 500),
            other => panic!("unexpected fragment {:?}", other),
        }

        let short = Retriever::new(&RagOptions::new().with_snippet_chars(10));
        match &short.retrieve("xxx", &store)[0] {
            ContextFragment::Text { content, .. } => assert_eq!(content.len(), 10),
            other => panic!("unexpected fragment {:?}", other),
        }
    }
}
