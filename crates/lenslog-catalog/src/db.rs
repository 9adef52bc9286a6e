use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::info;

use crate::models::{Photo, PhotoId};
use lenslog_geo::PhotoMetadata;

pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open catalog database")?;
        let catalog = Self { conn };
        catalog.migrate()?;
        Ok(catalog)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let catalog = Self { conn };
        catalog.migrate()?;
        Ok(catalog)
    }

    fn migrate(&self) -> Result<()> {
        info!("running catalog migrations");
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS photos (
                id           INTEGER PRIMARY KEY,
                file_path    TEXT NOT NULL UNIQUE,
                file_hash    TEXT NOT NULL,
                file_size    INTEGER NOT NULL,
                camera_make  TEXT,
                camera_model TEXT,
                date_taken   TEXT,
                latitude     REAL,
                longitude    REAL,
                imported_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_photos_hash ON photos(file_hash);
            ",
        )?;

        let alter_stmts = [
            "ALTER TABLE photos ADD COLUMN coordinates TEXT",
            "ALTER TABLE photos ADD COLUMN original_location TEXT",
        ];
        for stmt in alter_stmts {
            match self.conn.execute(stmt, []) {
                Ok(_) => {}
                Err(e) if e.to_string().contains("duplicate column") => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Insert a photo, returning `Some(id)` if inserted, `None` if the path already exists.
    pub fn insert_photo(&self, photo: &InsertPhoto) -> Result<Option<PhotoId>> {
        let meta = photo.metadata.as_ref();
        self.conn.execute(
            "INSERT OR IGNORE INTO photos (
                file_path, file_hash, file_size,
                camera_make, camera_model, date_taken,
                latitude, longitude, coordinates, original_location
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                photo.file_path,
                photo.file_hash,
                photo.file_size,
                photo.camera_make,
                photo.camera_model,
                photo.date_taken,
                meta.and_then(|m| m.latitude),
                meta.and_then(|m| m.longitude),
                meta.and_then(|m| m.coordinates.clone()),
                meta.and_then(|m| m.original_location.clone()),
            ],
        )?;
        if self.conn.changes() == 0 {
            Ok(None)
        } else {
            Ok(Some(self.conn.last_insert_rowid()))
        }
    }

    pub fn get_photo(&self, id: PhotoId) -> Result<Option<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, file_hash, file_size,
                    camera_make, camera_model, date_taken, imported_at,
                    latitude, longitude, coordinates, original_location
             FROM photos WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], row_to_photo)?;
        Ok(rows.next().transpose()?)
    }

    pub fn list_photos(&self) -> Result<Vec<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, file_hash, file_size,
                    camera_make, camera_model, date_taken, imported_at,
                    latitude, longitude, coordinates, original_location
             FROM photos ORDER BY date_taken DESC, id DESC",
        )?;
        let photos = stmt
            .query_map([], row_to_photo)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(photos)
    }

    /// Overwrite a photo's location metadata in place.
    pub fn update_metadata(&self, id: PhotoId, metadata: &PhotoMetadata) -> Result<()> {
        self.conn.execute(
            "UPDATE photos SET latitude = ?1, longitude = ?2,
                    coordinates = ?3, original_location = ?4
             WHERE id = ?5",
            params![
                metadata.latitude,
                metadata.longitude,
                metadata.coordinates,
                metadata.original_location,
                id,
            ],
        )?;
        Ok(())
    }

    pub fn photo_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?)
    }
}

fn row_to_photo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Photo> {
    let latitude: Option<f64> = row.get(8)?;
    let longitude: Option<f64> = row.get(9)?;
    let coordinates: Option<String> = row.get(10)?;
    let original_location: Option<String> = row.get(11)?;

    let metadata = if latitude.is_none()
        && longitude.is_none()
        && coordinates.is_none()
        && original_location.is_none()
    {
        None
    } else {
        Some(PhotoMetadata {
            latitude,
            longitude,
            coordinates,
            original_location,
        })
    };

    Ok(Photo {
        id: row.get(0)?,
        file_path: row.get(1)?,
        file_hash: row.get(2)?,
        file_size: row.get(3)?,
        camera_make: row.get(4)?,
        camera_model: row.get(5)?,
        date_taken: row.get(6)?,
        imported_at: row.get(7)?,
        metadata,
    })
}

pub struct InsertPhoto {
    pub file_path: String,
    pub file_hash: String,
    pub file_size: i64,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub date_taken: Option<String>,
    pub metadata: Option<PhotoMetadata>,
}
