//! Stored record types: text blocks, images, and tables.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A non-empty horizontal text region on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Trimmed text content
    pub content: String,
}

impl TextRecord {
    /// Create a new text record.
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }
}

/// Format bucket of an extracted image, inferred from its declared stream filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// JPEG data (DCTDecode or an explicit jpeg/jpg encoding)
    #[serde(rename = ".jpg")]
    Jpeg,
    /// PNG data
    #[serde(rename = ".png")]
    Png,
    /// Anything else; the payload is stored as opaque bytes
    #[serde(rename = ".bin")]
    Unknown,
}

impl ImageFormat {
    /// Classify a single, already lower-cased encoding token.
    ///
    /// Matching is by substring so that both `jpeg` and `dctdecode`-style
    /// names land in the JPEG bucket.
    pub fn from_encoding(token: &str) -> Self {
        if token.contains("jpeg") || token.contains("jpg") || token.contains("dct") {
            ImageFormat::Jpeg
        } else if token.contains("png") {
            ImageFormat::Png
        } else {
            ImageFormat::Unknown
        }
    }

    /// Parse a stored extension string (`.jpg`, `.png`, `.bin`).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            ".jpg" => ImageFormat::Jpeg,
            ".png" => ImageFormat::Png,
            _ => ImageFormat::Unknown,
        }
    }

    /// File extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Png => ".png",
            ImageFormat::Unknown => ".bin",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// An image or figure payload taken from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Generated name, `image_<counter><ext>`
    pub name: String,

    /// Format bucket
    pub format: ImageFormat,

    /// Raw (undecoded) stream bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
}

impl ImageRecord {
    /// Create a record for the `counter`-th image of the document.
    pub fn new(counter: usize, format: ImageFormat, data: Vec<u8>) -> Self {
        Self {
            name: format!("image_{}{}", counter, format.extension()),
            format,
            data,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A detected table: rows of cells, where a cell may be empty (`None`).
pub type TableGrid = Vec<Vec<Option<String>>>;

/// A detected table, stored as a JSON-encoded [`TableGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Zero-based index of the table within its page
    pub table_index: u32,

    /// JSON serialization of the cell grid
    pub content: String,
}

impl TableRecord {
    /// Serialize a grid into a record.
    pub fn from_grid(page_number: u32, table_index: u32, grid: &TableGrid) -> Result<Self> {
        Ok(Self {
            page_number,
            table_index,
            content: serde_json::to_string(grid)?,
        })
    }

    /// Decode the stored grid.
    pub fn grid(&self) -> Result<TableGrid> {
        Ok(serde_json::from_str(&self.content)?)
    }

    /// Decode the stored grid and flatten it to text.
    pub fn flattened(&self) -> Result<String> {
        Ok(flatten_grid(&self.grid()?))
    }
}

/// Render a grid as text: cells joined by `,`, rows by newline, empty cells as "".
pub fn flatten_grid(grid: &TableGrid) -> String {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything one extraction run produced, ready to replace the store contents.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Text blocks in walk order
    pub texts: Vec<TextRecord>,
    /// Images in walk order
    pub images: Vec<ImageRecord>,
    /// Tables in page order
    pub tables: Vec<TableRecord>,
}

impl ExtractedContent {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_from_encoding() {
        assert_eq!(ImageFormat::from_encoding("dctdecode"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_encoding("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_encoding("image/png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_encoding("flatedecode"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_encoding("unknown"), ImageFormat::Unknown);
    }

    #[test]
    fn test_image_format_extension_roundtrip() {
        for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Unknown] {
            assert_eq!(ImageFormat::from_extension(format.extension()), format);
        }
        assert_eq!(ImageFormat::from_extension(".tiff"), ImageFormat::Unknown);
    }

    #[test]
    fn test_image_record_name() {
        let record = ImageRecord::new(3, ImageFormat::Jpeg, vec![0xFF, 0xD8]);
        assert_eq!(record.name, "image_3.jpg");
        assert_eq!(record.size(), 2);

        let record = ImageRecord::new(0, ImageFormat::Unknown, vec![]);
        assert_eq!(record.name, "image_0.bin");
    }

    #[test]
    fn test_table_record_json() {
        let grid: TableGrid = vec![
            vec![Some("Size".to_string()), Some("Weight".to_string())],
            vec![Some("1x1.5".to_string()), None],
        ];
        let record = TableRecord::from_grid(2, 0, &grid).unwrap();
        assert_eq!(record.content, r#"[["Size","Weight"],["1x1.5",null]]"#);
        assert_eq!(record.grid().unwrap(), grid);
        assert_eq!(record.flattened().unwrap(), "Size,Weight\n1x1.5,");
    }

    #[test]
    fn test_table_record_malformed() {
        let record = TableRecord {
            page_number: 1,
            table_index: 0,
            content: "{broken".to_string(),
        };
        assert!(record.grid().is_err());
    }

    #[test]
    fn test_image_format_serde() {
        let json = serde_json::to_string(&ImageFormat::Png).unwrap();
        assert_eq!(json, "\".png\"");
    }
}
