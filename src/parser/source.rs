//! PDF input sources and header validation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Where a PDF comes from.
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// A file on disk
    Path(PathBuf),
    /// An in-memory document
    Bytes(Vec<u8>),
}

impl PdfSource {
    /// Human-readable label for logging.
    pub fn label(&self) -> String {
        match self {
            PdfSource::Path(path) => path.display().to_string(),
            PdfSource::Bytes(data) => format!("<{} bytes>", data.len()),
        }
    }

    /// Validate the header and load the document.
    pub fn load(&self) -> Result<LopdfDocument> {
        let doc = match self {
            PdfSource::Path(path) => {
                read_version_from_path(path)?;
                LopdfDocument::load(path)?
            }
            PdfSource::Bytes(data) => {
                read_version(data)?;
                LopdfDocument::load_mem(data)?
            }
        };

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(doc)
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        PdfSource::Path(path)
    }
}

impl From<&Path> for PdfSource {
    fn from(path: &Path) -> Self {
        PdfSource::Path(path.to_path_buf())
    }
}

impl From<&str> for PdfSource {
    fn from(path: &str) -> Self {
        PdfSource::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(data: Vec<u8>) -> Self {
        PdfSource::Bytes(data)
    }
}

/// Read the PDF version from the first bytes of a file.
pub fn read_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    read_version(&header)
}

/// Read the PDF version (e.g. `1.7`) from a `%PDF-x.y` header.
pub fn read_version(data: &[u8]) -> Result<String> {
    let Some(rest) = data.strip_prefix(PDF_MAGIC) else {
        return Err(Error::UnknownFormat);
    };
    let Some(version_bytes) = rest.get(..VERSION_LEN) else {
        return Err(Error::UnknownFormat);
    };

    let version = String::from_utf8_lossy(version_bytes).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_version() {
        assert_eq!(read_version(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(read_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_read_version_rejects_other_formats() {
        assert!(matches!(read_version(b"<!DOCTYPE html>"), Err(Error::UnknownFormat)));
        assert!(matches!(read_version(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            read_version(b"%PDF-x.y"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_load_garbage_bytes() {
        let source = PdfSource::from(b"not a pdf at all".to_vec());
        assert!(matches!(source.load(), Err(Error::UnknownFormat)));
        assert_eq!(source.label(), "<16 bytes>");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = PdfSource::from(dir.path().join("missing.pdf"));
        assert!(matches!(source.load(), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_truncated_pdf() {
        let source = PdfSource::from(b"%PDF-1.5\n1 0 obj\n<<".to_vec());
        assert!(source.load().is_err());
    }
}
