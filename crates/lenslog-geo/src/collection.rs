use tracing::debug;

use crate::metadata::PhotoMetadata;

/// A record that may carry location metadata.
///
/// Implemented by the catalog's photo model; tests use their own small
/// record types. The corrector only ever reads the metadata and writes a
/// replacement bag, so this is the whole seam.
pub trait GeoTagged {
    fn geo_metadata(&self) -> Option<&PhotoMetadata>;
    fn set_geo_metadata(&mut self, metadata: PhotoMetadata);
}

/// Outcome of a correction pass over a set of records.
#[derive(Clone, Debug)]
pub struct CorrectionResult<T> {
    /// Same length and order as the input.
    pub records: Vec<T>,
    /// How many records came out with a different longitude.
    pub corrected: usize,
}

/// Apply the longitude sign correction across a set of records.
///
/// Records without metadata, or whose metadata lacks a usable coordinate
/// pair, pass through as exact clones. Nothing in here fails: a malformed
/// record is simply not corrected.
pub fn correct_collection<T: GeoTagged + Clone>(records: &[T]) -> CorrectionResult<T> {
    let mut out = Vec::with_capacity(records.len());
    let mut corrected = 0;

    for record in records {
        match record.geo_metadata().and_then(PhotoMetadata::corrected) {
            Some(fixed) => {
                let mut updated = record.clone();
                updated.set_geo_metadata(fixed);
                out.push(updated);
                corrected += 1;
            }
            None => out.push(record.clone()),
        }
    }

    debug!(total = records.len(), corrected, "coordinate correction pass");

    CorrectionResult {
        records: out,
        corrected,
    }
}
