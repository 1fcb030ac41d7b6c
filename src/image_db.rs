use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::utils::db;

// The map image lives in its own database file so a session reset never has
// to touch it (and the other way around).

/// Used when the bytes are not a format `image` recognizes.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageBlob {
    /// Wraps raw uploaded bytes, sniffing the content type from the header.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let content_type = match image::guess_format(&data) {
            Ok(format) => format.to_mime_type().to_string(),
            Err(_) => {
                debug!("[image_db] unknown image format, storing as octet-stream");
                FALLBACK_CONTENT_TYPE.to_string()
            }
        };
        Self { content_type, data }
    }
}

pub struct ImageDb {
    conn: Connection,
}

impl ImageDb {
    pub fn open(support_dir: &str) -> Result<ImageDb> {
        let conn = db::open_db_and_run_migration(
            support_dir,
            "images.db",
            &[&|tx| {
                let sql = "
                CREATE TABLE images (
                    key               TEXT    PRIMARY KEY
                                              NOT NULL
                                              UNIQUE,
                    content_type      TEXT    NOT NULL,
                    data              BLOB    NOT NULL
                );
                ";
                db::run_sql_script(tx, sql)
            }],
        )?;
        Ok(ImageDb { conn })
    }

    pub fn put_image(&mut self, key: &str, image: &ImageBlob) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO images (key, content_type, data) VALUES (?1, ?2, ?3);",
            (key, &image.content_type, &image.data),
        )?;
        Ok(())
    }

    pub fn get_image(&self, key: &str) -> Result<Option<ImageBlob>> {
        let mut query = self
            .conn
            .prepare("SELECT content_type, data FROM images WHERE key = ?1;")?;
        let image = query
            .query_row((key,), |row| {
                Ok(ImageBlob {
                    content_type: row.get(0)?,
                    data: row.get(1)?,
                })
            })
            .optional()?;
        Ok(image)
    }
}
