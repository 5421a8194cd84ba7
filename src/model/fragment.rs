//! Retrieved context fragments.

use serde::{Deserialize, Serialize};

use super::ImageFormat;

/// A single snippet retrieved from the store for prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContextFragment {
    /// A matching text block
    Text {
        /// Page number
        page: u32,
        /// Truncated block content
        content: String,
    },
    /// A matching table, flattened to text
    Table {
        /// Page number
        page: u32,
        /// Index of the table on its page
        index: u32,
        /// Truncated flattened content
        content: String,
    },
    /// An image whose name matched
    Image {
        /// Image name
        name: String,
        /// Image format
        format: ImageFormat,
    },
}

impl ContextFragment {
    /// Fragment kind as used in the prompt context (`text`, `table`, `image`).
    pub fn kind(&self) -> &'static str {
        match self {
            ContextFragment::Text { .. } => "text",
            ContextFragment::Table { .. } => "table",
            ContextFragment::Image { .. } => "image",
        }
    }

    /// Page number, if the fragment has one.
    pub fn page(&self) -> Option<u32> {
        match self {
            ContextFragment::Text { page, .. } | ContextFragment::Table { page, .. } => Some(*page),
            ContextFragment::Image { .. } => None,
        }
    }
}

impl std::fmt::Display for ContextFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextFragment::Text { page, content } | ContextFragment::Table { page, content, .. } => {
                write!(
                    f,
                    "{} (Page {}): {}",
                    self.kind().to_uppercase(),
                    page,
                    content
                )
            }
            ContextFragment::Image { name, .. } => write!(f, "IMAGE: {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_display() {
        let text = ContextFragment::Text {
            page: 1,
            content: "Rated voltage".to_string(),
        };
        assert_eq!(text.to_string(), "TEXT (Page 1): Rated voltage");

        let table = ContextFragment::Table {
            page: 4,
            index: 1,
            content: "a,b".to_string(),
        };
        assert_eq!(table.to_string(), "TABLE (Page 4): a,b");

        let image = ContextFragment::Image {
            name: "image_0.jpg".to_string(),
            format: ImageFormat::Jpeg,
        };
        assert_eq!(image.to_string(), "IMAGE: image_0.jpg");
        assert_eq!(image.page(), None);
    }

    #[test]
    fn test_fragment_json_is_tagged() {
        let text = ContextFragment::Text {
            page: 2,
            content: "x".to_string(),
        };
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"type":"text","page":2,"content":"x"}"#);
    }
}
