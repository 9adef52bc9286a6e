use serde::{Deserialize, Serialize};

use lenslog_geo::{GeoTagged, PhotoMetadata};

pub type PhotoId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub file_path: String,
    pub file_hash: String,
    pub file_size: i64,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub date_taken: Option<String>,
    pub imported_at: String,
    pub metadata: Option<PhotoMetadata>,
}

impl GeoTagged for Photo {
    fn geo_metadata(&self) -> Option<&PhotoMetadata> {
        self.metadata.as_ref()
    }

    fn set_geo_metadata(&mut self, metadata: PhotoMetadata) {
        self.metadata = Some(metadata);
    }
}
