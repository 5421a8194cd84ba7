//! SQLite-backed record store.
//!
//! Holds the three record collections (`texts`, `images`, `tables`) in a
//! single embedded database file. Schema creation is idempotent; every
//! extraction run replaces all three collections in one transaction.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::model::{ExtractedContent, ImageFormat, ImageRecord, TableRecord, TextRecord};

/// Default database file name.
pub const DEFAULT_DB_PATH: &str = "extracted_data.db";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS texts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        page_number INTEGER,
        content TEXT
    );
    CREATE TABLE IF NOT EXISTS images (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        image_name TEXT,
        image_format TEXT,
        image_data BLOB
    );
    CREATE TABLE IF NOT EXISTS tables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        page_number INTEGER,
        table_index INTEGER,
        content TEXT
    );
";

/// Number of rows in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    /// Text blocks
    pub texts: usize,
    /// Images
    pub images: usize,
    /// Tables
    pub tables: usize,
}

impl RecordCounts {
    /// Total number of records.
    pub fn total(&self) -> usize {
        self.texts + self.images + self.tables
    }
}

/// Image name and format without the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Image name
    pub name: String,
    /// Image format
    pub format: ImageFormat,
}

/// Connection to a record store.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) a store file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// File backing this store (`None` for in-memory stores).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Discard every record and write `content` in its place, atomically.
    pub fn replace_all(&mut self, content: &ExtractedContent) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM texts", [])?;
        tx.execute("DELETE FROM images", [])?;
        tx.execute("DELETE FROM tables", [])?;

        {
            let mut stmt = tx.prepare("INSERT INTO texts (page_number, content) VALUES (?1, ?2)")?;
            for text in &content.texts {
                stmt.execute(params![text.page_number, text.content])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO images (image_name, image_format, image_data) VALUES (?1, ?2, ?3)",
            )?;
            for image in &content.images {
                stmt.execute(params![image.name, image.format.extension(), image.data])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO tables (page_number, table_index, content) VALUES (?1, ?2, ?3)",
            )?;
            for table in &content.tables {
                stmt.execute(params![table.page_number, table.table_index, table.content])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Remove all records.
    pub fn clear(&mut self) -> Result<()> {
        self.replace_all(&ExtractedContent::default())
    }

    /// Append a single text record.
    pub fn insert_text(&self, record: &TextRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO texts (page_number, content) VALUES (?1, ?2)",
            params![record.page_number, record.content],
        )?;
        Ok(())
    }

    /// Append a single image record.
    pub fn insert_image(&self, record: &ImageRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO images (image_name, image_format, image_data) VALUES (?1, ?2, ?3)",
            params![record.name, record.format.extension(), record.data],
        )?;
        Ok(())
    }

    /// Append a single table record. The content is stored verbatim.
    pub fn insert_table(&self, record: &TableRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tables (page_number, table_index, content) VALUES (?1, ?2, ?3)",
            params![record.page_number, record.table_index, record.content],
        )?;
        Ok(())
    }

    /// All text records in insertion order.
    pub fn texts(&self) -> Result<Vec<TextRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT page_number, content FROM texts ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(TextRecord {
                page_number: row.get(0)?,
                content: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All image records, including payloads, in insertion order.
    pub fn images(&self) -> Result<Vec<ImageRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT image_name, image_format, image_data FROM images ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let format: Option<String> = row.get(1)?;
            Ok(ImageRecord {
                name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                format: ImageFormat::from_extension(format.as_deref().unwrap_or("")),
                data: row.get::<_, Option<Vec<u8>>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Image names and formats in insertion order, without loading payloads.
    pub fn image_entries(&self) -> Result<Vec<ImageEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT image_name, image_format FROM images ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let format: Option<String> = row.get(1)?;
            Ok(ImageEntry {
                name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                format: ImageFormat::from_extension(format.as_deref().unwrap_or("")),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All table records in insertion order.
    pub fn tables(&self) -> Result<Vec<TableRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT page_number, table_index, content FROM tables ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(TableRecord {
                page_number: row.get(0)?,
                table_index: row.get(1)?,
                content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Row counts of all collections.
    pub fn counts(&self) -> Result<RecordCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };

        Ok(RecordCounts {
            texts: count("texts")?,
            images: count("images")?,
            tables: count("tables")?,
        })
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}
