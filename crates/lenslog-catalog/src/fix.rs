use anyhow::Result;
use tracing::info;

use crate::db::Catalog;
use lenslog_geo::correct_collection;

pub struct FixResult {
    pub examined: usize,
    pub corrected: usize,
}

/// Run the longitude sign correction over every photo in the catalog and
/// persist the rewritten metadata.
///
/// Only records whose longitude actually changed are written back, so the
/// pass is safe to re-run; a second invocation reports zero corrections.
pub fn fix_coordinates(catalog: &Catalog) -> Result<FixResult> {
    let photos = catalog.list_photos()?;
    let examined = photos.len();

    let result = correct_collection(&photos);

    for (before, after) in photos.iter().zip(&result.records) {
        if before.metadata == after.metadata {
            continue;
        }
        if let Some(metadata) = &after.metadata {
            catalog.update_metadata(after.id, metadata)?;
        }
    }

    info!(examined, corrected = result.corrected, "coordinate fix pass complete");

    Ok(FixResult {
        examined,
        corrected: result.corrected,
    })
}
