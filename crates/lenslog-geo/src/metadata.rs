use serde::{Deserialize, Serialize};

use crate::correct::correct_coordinates;

/// Location metadata attached to a photo record.
///
/// `coordinates` redundantly encodes `latitude`/`longitude` as a
/// `"lat,lng"` string for display. `original_location` is free text typed
/// by the photographer and is never touched by any correction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinates: Option<String>,
    pub original_location: Option<String>,
}

impl PhotoMetadata {
    /// Both coordinates present and usable as numbers.
    pub fn has_coordinates(&self) -> bool {
        matches!(
            (self.latitude, self.longitude),
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite()
        )
    }

    /// Apply the longitude sign correction to this bag.
    ///
    /// Returns `Some` with a rewritten copy when the stored longitude
    /// actually changed, `None` when there is nothing to fix. A bag missing
    /// either coordinate is left alone; correction needs both values.
    ///
    /// When the longitude flips, the `coordinates` string (if present) is
    /// rebuilt from the numeric fields so the two representations cannot
    /// drift apart.
    pub fn corrected(&self) -> Option<PhotoMetadata> {
        if !self.has_coordinates() {
            return None;
        }
        let latitude = self.latitude?;
        let longitude = self.longitude?;

        let (_, fixed) = correct_coordinates(latitude, longitude);
        if fixed == longitude {
            return None;
        }

        let mut out = self.clone();
        out.longitude = Some(fixed);
        if out.coordinates.is_some() {
            out.coordinates = Some(format!("{latitude},{fixed}"));
        }
        Some(out)
    }
}
