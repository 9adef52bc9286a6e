use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::db::{Catalog, InsertPhoto};
use crate::models::PhotoId;
use lenslog_geo::PhotoMetadata;
use lenslog_metadata::exif::{ExifData, is_supported_extension};

pub struct ImportResult {
    pub imported: Vec<PhotoId>,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Scan a folder for supported images and import them into the catalog.
pub fn import_folder(catalog: &Catalog, folder: &Path) -> Result<ImportResult> {
    info!(?folder, "importing folder");

    let mut result = ImportResult {
        imported: Vec::new(),
        skipped: 0,
        errors: Vec::new(),
    };

    let entries: Vec<_> = fs::read_dir(folder)
        .with_context(|| format!("failed to read directory: {}", folder.display()))?
        .collect();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                result.errors.push(format!("readdir error: {err}"));
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_supported_extension(ext) {
            continue;
        }

        match import_single_file(catalog, &path) {
            Ok(Some(id)) => result.imported.push(id),
            Ok(None) => result.skipped += 1,
            Err(err) => {
                warn!(?path, %err, "failed to import");
                result.errors.push(format!("{}: {err}", path.display()));
            }
        }
    }

    info!(
        imported = result.imported.len(),
        skipped = result.skipped,
        errors = result.errors.len(),
        "import complete"
    );

    Ok(result)
}

fn import_single_file(catalog: &Catalog, path: &Path) -> Result<Option<PhotoId>> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to canonicalize: {}", path.display()))?;
    let file_path = canonical.to_string_lossy().to_string();

    let stat = fs::metadata(&canonical)
        .with_context(|| format!("failed to stat: {}", canonical.display()))?;
    let file_size = stat.len() as i64;
    let file_hash = hash_file(&canonical)?;

    // Photos without EXIF (or with unreadable EXIF) still get imported.
    let exif = ExifData::from_file(&canonical).ok();

    let insert = InsertPhoto {
        file_path,
        file_hash,
        file_size,
        camera_make: exif.as_ref().and_then(|e| e.camera_make.clone()),
        camera_model: exif.as_ref().and_then(|e| e.camera_model.clone()),
        date_taken: exif.as_ref().and_then(|e| e.date_taken.clone()),
        metadata: exif.as_ref().and_then(metadata_from_exif),
    };

    catalog.insert_photo(&insert)
}

/// Streaming blake3 of the file contents, used as the photo's identity
/// across renames.
fn hash_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)
        .with_context(|| format!("failed to open: {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 65536];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("failed to read: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Build the location bag for a freshly ingested photo.
///
/// The sign correction runs once here, before first persist, so a camera
/// (or an upstream tool) that wrote a bare magnitude never gets a wrong
/// sign into the catalog in the first place.
fn metadata_from_exif(exif: &ExifData) -> Option<PhotoMetadata> {
    let latitude = exif.latitude?;
    let longitude = exif.longitude?;

    let metadata = PhotoMetadata {
        latitude: Some(latitude),
        longitude: Some(longitude),
        coordinates: Some(format!("{latitude},{longitude}")),
        original_location: None,
    };
    Some(metadata.corrected().unwrap_or(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_from_exif_corrects_on_ingest() {
        let exif = ExifData {
            latitude: Some(40.7128),
            longitude: Some(74.006),
            ..Default::default()
        };
        let meta = metadata_from_exif(&exif).unwrap();
        assert_eq!(meta.longitude, Some(-74.006));
        assert_eq!(meta.coordinates.as_deref(), Some("40.7128,-74.006"));
    }

    #[test]
    fn metadata_from_exif_keeps_correct_values() {
        let exif = ExifData {
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            ..Default::default()
        };
        let meta = metadata_from_exif(&exif).unwrap();
        assert_eq!(meta.longitude, Some(-74.006));
        assert_eq!(meta.coordinates.as_deref(), Some("40.7128,-74.006"));
    }

    #[test]
    fn metadata_from_exif_requires_both_axes() {
        let exif = ExifData {
            latitude: Some(40.7128),
            ..Default::default()
        };
        assert!(metadata_from_exif(&exif).is_none());
        assert!(metadata_from_exif(&ExifData::default()).is_none());
    }

    #[test]
    fn import_missing_folder_is_error() {
        let catalog = Catalog::open_in_memory().unwrap();
        let result = import_folder(&catalog, Path::new("/nonexistent/folder"));
        assert!(result.is_err());
    }

    #[test]
    fn import_skips_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a photo").unwrap();

        let catalog = Catalog::open_in_memory().unwrap();
        let result = import_folder(&catalog, dir.path()).unwrap();
        assert!(result.imported.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(catalog.photo_count().unwrap(), 0);
    }

    #[test]
    fn import_tolerates_unreadable_exif() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.jpg"), b"not really a jpeg").unwrap();

        let catalog = Catalog::open_in_memory().unwrap();
        let result = import_folder(&catalog, dir.path()).unwrap();
        // EXIF is optional, so a garbage file still imports by hash.
        assert_eq!(result.imported.len(), 1);

        let photo = catalog.get_photo(result.imported[0]).unwrap().unwrap();
        assert!(photo.metadata.is_none());
        assert!(photo.camera_make.is_none());
    }
}
