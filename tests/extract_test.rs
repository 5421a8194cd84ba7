//! Integration tests for PDF extraction into the store.

mod common;

use common::{build_pdf, empty_image, form_figure, jpeg_image, table_page, PageBuilder, JPEG_BYTES};
use lopdf::Object;
use pdfchat::{
    extract, ExtractOptions, ImageFormat, PdfExtractor, PdfSource, Store, TextRecord,
};

fn datasheet_pdf() -> Vec<u8> {
    let first = PageBuilder::new()
        .text("Cable Datasheet", 72, 700)
        .text("Copper conductor with XLPE insulation", 72, 680)
        .xobject("Im1", jpeg_image())
        .xobject("Im2", empty_image())
        .xobject("Fm1", form_figure())
        .paint("Im1")
        .paint("Im2")
        .paint("Fm1")
        .paint("Missing");

    build_pdf(vec![first, table_page()])
}

#[test]
fn test_extract_texts_images_tables() {
    let mut store = Store::open_in_memory().unwrap();
    let report = PdfExtractor::new(datasheet_pdf()).run(&mut store).unwrap();

    assert_eq!(report.pages, 2);

    let texts = store.texts().unwrap();
    assert!(!texts.is_empty());
    assert!(texts.iter().all(|t| !t.content.trim().is_empty()));
    assert!(texts.iter().all(|t| t.content == t.content.trim()));
    assert!(texts
        .iter()
        .any(|t| t.page_number == 1 && t.content.contains("Cable Datasheet")));
    assert!(texts
        .iter()
        .any(|t| t.page_number == 2 && t.content.contains("Voltage")));

    // Page numbers are non-decreasing in walk order
    let pages: Vec<u32> = texts.iter().map(|t| t.page_number).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));

    let tables = store.tables().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].page_number, 2);
    assert_eq!(tables[0].table_index, 0);
    let grid = tables[0].grid().unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[0][0].as_deref(), Some("Size"));
    assert_eq!(grid[1][1].as_deref(), Some("120"));
    assert_eq!(grid[2][2].as_deref(), Some("0.6/1kV"));

    assert_eq!(report.counts, store.counts().unwrap());
}

#[test]
fn test_image_names_follow_stored_images() {
    let mut store = Store::open_in_memory().unwrap();
    let report = PdfExtractor::new(datasheet_pdf()).run(&mut store).unwrap();

    // The empty stream is skipped without consuming a counter value
    let images = store.images().unwrap();
    let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["image_0.jpg", "image_1.bin"]);

    assert_eq!(images[0].format, ImageFormat::Jpeg);
    assert_eq!(images[0].data, JPEG_BYTES);
    assert_eq!(images[1].format, ImageFormat::Unknown);
    assert_eq!(images[1].data, b"0 0 10 10 re f".to_vec());

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].page, Some(1));
}

#[test]
fn test_extraction_replaces_previous_records() {
    let mut store = Store::open_in_memory().unwrap();
    assert!(extract(datasheet_pdf(), &mut store));
    let first = store.counts().unwrap();
    assert!(extract(datasheet_pdf(), &mut store));
    assert_eq!(store.counts().unwrap(), first);

    let plain = build_pdf(vec![PageBuilder::new().text("Only text here", 72, 700)]);
    assert!(extract(plain, &mut store));

    let counts = store.counts().unwrap();
    assert_eq!(counts.images, 0);
    assert_eq!(counts.tables, 0);
    let texts = store.texts().unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].content, "Only text here");
}

#[test]
fn test_failed_extraction_keeps_store() {
    let mut store = Store::open_in_memory().unwrap();
    assert!(extract(datasheet_pdf(), &mut store));
    let before = store.counts().unwrap();

    assert!(!extract(b"%PDF-1.5 but truncated".to_vec(), &mut store));
    assert!(!extract(b"plain text".to_vec(), &mut store));
    assert_eq!(store.counts().unwrap(), before);
}

#[test]
fn test_unwritable_store_fails_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("legacy.db");
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch("CREATE TABLE tables (id INTEGER PRIMARY KEY, body TEXT);")
            .unwrap();
    }

    let mut store = Store::open(&db_path).unwrap();
    store
        .insert_text(&TextRecord::new(7, "Kept from an earlier run"))
        .unwrap();

    assert!(!extract(datasheet_pdf(), &mut store));

    let texts = store.texts().unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].page_number, 7);
    assert_eq!(texts[0].content, "Kept from an earlier run");
    assert_eq!(store.counts().unwrap().images, 0);
}

#[test]
fn test_far_apart_spans_extract_normally() {
    let page = PageBuilder::new()
        .text("left", 0, 700)
        .text("right", 4_000_000_000_000, 700)
        .text("left below", 0, 680)
        .text("right below", 4_000_000_000_000, 680);
    let pdf = build_pdf(vec![page]);

    let mut store = Store::open_in_memory().unwrap();
    assert!(extract(pdf, &mut store));

    let texts = store.texts().unwrap();
    assert!(texts.iter().any(|t| t.content.contains("left")));
    assert!(texts.iter().any(|t| t.content.contains("right")));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(dir.path().join("store.db")).unwrap();
    assert!(!extract(dir.path().join("nope.pdf"), &mut store));
    assert_eq!(store.counts().unwrap().total(), 0);
}

#[test]
fn test_extract_from_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("datasheet.pdf");
    std::fs::write(&pdf_path, datasheet_pdf()).unwrap();

    let db_path = dir.path().join("extracted_data.db");
    {
        let mut store = Store::open(&db_path).unwrap();
        assert!(extract(PdfSource::Path(pdf_path), &mut store));
    }

    // Records persist across connections
    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.counts().unwrap().images, 2);
}

#[test]
fn test_broken_page_is_skipped() {
    let broken = PageBuilder::new().raw_contents(Object::Integer(5));
    let good = PageBuilder::new().text("Second page survives", 72, 700);
    let pdf = build_pdf(vec![broken, good]);

    let mut store = Store::open_in_memory().unwrap();
    let report = PdfExtractor::new(pdf).run(&mut store).unwrap();

    assert!(report.diagnostics.iter().all(|d| d.page == Some(1)));
    assert!(!report.diagnostics.is_empty());

    let texts = store.texts().unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].page_number, 2);
    assert_eq!(texts[0].content, "Second page survives");
}

#[test]
fn test_table_indexes_are_per_page() {
    let page = table_page()
        .text("Notes follow below", 150, 640)
        .text("Type", 72, 600)
        .text("Colour", 200, 600)
        .text("Code", 330, 600)
        .text("A", 72, 585)
        .text("Red", 200, 585)
        .text("R1", 330, 585)
        .text("B", 72, 570)
        .text("Blue", 200, 570)
        .text("B1", 330, 570);
    let pdf = build_pdf(vec![page, table_page()]);

    let mut store = Store::open_in_memory().unwrap();
    PdfExtractor::new(pdf).run(&mut store).unwrap();

    let keys: Vec<(u32, u32)> = store
        .tables()
        .unwrap()
        .iter()
        .map(|t| (t.page_number, t.table_index))
        .collect();
    assert_eq!(keys, vec![(1, 0), (1, 1), (2, 0)]);

    let second = store.tables().unwrap()[1].grid().unwrap();
    assert_eq!(second[0][1].as_deref(), Some("Colour"));
}

#[test]
fn test_text_only_options() {
    let mut store = Store::open_in_memory().unwrap();
    let extractor =
        PdfExtractor::with_options(datasheet_pdf(), ExtractOptions::new().text_only());
    let report = extractor.run(&mut store).unwrap();

    assert_eq!(report.counts.images, 0);
    assert_eq!(report.counts.tables, 0);
    assert!(report.counts.texts > 0);
}
