//! Layout element classification.

use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

use crate::error::{Error, Result};
use crate::model::ImageFormat;

/// A layout element found on a page.
#[derive(Debug, Clone)]
pub enum PageElement<'a> {
    /// A horizontal text block (untrimmed text)
    TextRegion(String),
    /// A raster image XObject
    ImageRegion(XObjectStream<'a>),
    /// A form XObject (embedded figure)
    FigureRegion(XObjectStream<'a>),
    /// Anything else, with a short description for logging
    Other(String),
}

/// An XObject stream referenced from a page's content.
#[derive(Debug, Clone)]
pub struct XObjectStream<'a> {
    /// Resource name used with `Do`
    pub name: String,
    /// The underlying stream
    pub stream: &'a Stream,
}

impl XObjectStream<'_> {
    /// Read the raw payload and classify its declared encoding.
    pub fn read(&self) -> Result<(ImageFormat, Vec<u8>)> {
        if self.stream.content.is_empty() {
            return Err(Error::ImageExtract(format!(
                "XObject /{} has an empty stream",
                self.name
            )));
        }
        let format = normalize_encoding(self.stream.dict.get(b"Filter").ok());
        Ok((format, self.stream.content.clone()))
    }
}

/// First declared encoding token, lower-cased.
///
/// `/Filter` may be a name, a string, or an array of either; for arrays the
/// first entry wins.
pub fn declared_encoding(filter: Option<&Object>) -> Option<String> {
    match filter? {
        Object::Name(token) | Object::String(token, _) => {
            Some(String::from_utf8_lossy(token).to_lowercase())
        }
        Object::Array(items) => declared_encoding(items.first()),
        _ => None,
    }
}

/// Map a `/Filter` entry to its image format bucket.
pub fn normalize_encoding(filter: Option<&Object>) -> ImageFormat {
    declared_encoding(filter)
        .map(|token| ImageFormat::from_encoding(&token))
        .unwrap_or(ImageFormat::Unknown)
}

/// Look up a `Do` operand in the page's `/XObject` resources and classify it.
pub fn resolve_xobject<'a>(
    doc: &'a LopdfDocument,
    resources: Option<&'a Dictionary>,
    name: &[u8],
) -> PageElement<'a> {
    let display_name = String::from_utf8_lossy(name).to_string();

    let stream = resources
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|xobjects| deref(doc, xobjects).as_dict().ok())
        .and_then(|xobjects| xobjects.get(name).ok())
        .and_then(|obj| deref(doc, obj).as_stream().ok());

    let Some(stream) = stream else {
        return PageElement::Other(format!("unresolved XObject /{}", display_name));
    };

    let subtype = stream
        .dict
        .get(b"Subtype")
        .and_then(Object::as_name)
        .unwrap_or_default();

    let xobject = XObjectStream {
        name: display_name,
        stream,
    };

    match subtype {
        b"Image" => PageElement::ImageRegion(xobject),
        b"Form" => PageElement::FigureRegion(xobject),
        other => PageElement::Other(format!(
            "{} XObject /{}",
            String::from_utf8_lossy(other),
            xobject.name
        )),
    }
}

fn deref<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}
