//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// JPEG start/end markers; enough for a payload round trip.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];

/// One page under construction.
pub struct PageBuilder {
    operations: Vec<Operation>,
    xobjects: Vec<(String, Stream)>,
    contents: Option<Object>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            xobjects: Vec::new(),
            contents: None,
        }
    }

    /// Show `text` at (x, y) in 12pt Helvetica.
    pub fn text(mut self, text: &str, x: i64, y: i64) -> Self {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    /// Paint the XObject named `name`.
    pub fn paint(mut self, name: &str) -> Self {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![100.into(), 0.into(), 0.into(), 100.into(), 50.into(), 50.into()],
            ),
            Operation::new("Do", vec![name.into()]),
            Operation::new("Q", vec![]),
        ]);
        self
    }

    /// Register a stream under `/XObject /<name>`.
    pub fn xobject(mut self, name: &str, stream: Stream) -> Self {
        self.xobjects.push((name.to_string(), stream));
        self
    }

    /// Replace the `/Contents` entry with an arbitrary object.
    pub fn raw_contents(mut self, contents: Object) -> Self {
        self.contents = Some(contents);
        self
    }
}

pub fn jpeg_image() -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        JPEG_BYTES.to_vec(),
    )
}

pub fn empty_image() -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
        },
        Vec::new(),
    )
}

pub fn form_figure() -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        },
        b"0 0 10 10 re f".to_vec(),
    )
}

/// Three-column cable table: header row plus two data rows.
pub fn table_page() -> PageBuilder {
    PageBuilder::new()
        .text("Size", 72, 700)
        .text("Weight", 200, 700)
        .text("Voltage", 330, 700)
        .text("1x1.5", 72, 685)
        .text("120", 200, 685)
        .text("0.6/1kV", 330, 685)
        .text("1x2.5", 72, 670)
        .text("145", 200, 670)
        .text("0.6/1kV", 330, 670)
}

/// Serialize the pages into a PDF.
pub fn build_pdf(pages: Vec<PageBuilder>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut xobjects = Dictionary::new();
        for (name, stream) in page.xobjects {
            let id = doc.add_object(stream);
            xobjects.set(name, id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        });

        let contents = match page.contents {
            Some(contents) => contents,
            None => {
                let content = Content {
                    operations: page.operations,
                };
                let encoded = content.encode().expect("encode content");
                Object::Reference(doc.add_object(Stream::new(dictionary! {}, encoded)))
            }
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => contents,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}
