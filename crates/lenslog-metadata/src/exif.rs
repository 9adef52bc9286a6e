use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use exif::{In, Tag};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The slice of EXIF the blog cares about: enough camera info for a
/// caption, the capture date, and the GPS position in signed decimal
/// degrees.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExifData {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub date_taken: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ExifData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let exif_reader = exif::Reader::new();
        let exif = exif_reader
            .read_from_container(&mut reader)
            .with_context(|| format!("read EXIF from {}", path.display()))?;

        let data = Self {
            camera_make: get_string(&exif, Tag::Make),
            camera_model: get_string(&exif, Tag::Model),
            date_taken: get_string(&exif, Tag::DateTimeOriginal),
            latitude: gps_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
            longitude: gps_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        };
        debug!(
            path = %path.display(),
            has_gps = data.latitude.is_some() && data.longitude.is_some(),
            "read EXIF"
        );
        Ok(data)
    }

    pub fn has_gps(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// File extensions whose containers carry readable EXIF.
pub fn is_supported_extension(ext: &str) -> bool {
    const SUPPORTED: [&str; 8] = ["jpg", "jpeg", "png", "tif", "tiff", "webp", "heic", "heif"];
    SUPPORTED.iter().any(|s| ext.eq_ignore_ascii_case(s))
}

fn get_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
    exif.get_field(tag, In::PRIMARY)
        .map(|f| f.display_value().to_string().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read one GPS axis: a rational degrees/minutes/seconds triple plus its
/// hemisphere reference letter. Either missing means no coordinate.
fn gps_coordinate(exif: &exif::Exif, tag: Tag, ref_tag: Tag) -> Option<f64> {
    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .map(|f| f.display_value().to_string())?;

    let field = exif.get_field(tag, In::PRIMARY)?;
    let dms: Vec<f64> = match field.value {
        exif::Value::Rational(ref v) => v.iter().map(|r| r.to_f64()).collect(),
        _ => return None,
    };

    dms_to_decimal(&dms, hemisphere.trim())
}

/// Convert a degrees/minutes/seconds triple to signed decimal degrees.
///
/// Southern and western hemisphere references produce negative values.
/// Shorter triples are tolerated (some cameras write plain degrees or
/// degrees + decimal minutes with no seconds term).
pub fn dms_to_decimal(dms: &[f64], hemisphere: &str) -> Option<f64> {
    let degrees = *dms.first()?;
    let minutes = dms.get(1).copied().unwrap_or(0.0);
    let seconds = dms.get(2).copied().unwrap_or(0.0);

    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    let signed = match hemisphere {
        "S" | "W" => -magnitude,
        _ => magnitude,
    };
    signed.is_finite().then_some(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dms_north_and_east_positive() {
        let lat = dms_to_decimal(&[40.0, 42.0, 46.08], "N").unwrap();
        assert!((lat - 40.7128).abs() < 1e-4, "got {lat}");

        let lng = dms_to_decimal(&[2.0, 21.0, 3.0], "E").unwrap();
        assert!((lng - 2.350833).abs() < 1e-4, "got {lng}");
    }

    #[test]
    fn dms_south_and_west_negative() {
        let lng = dms_to_decimal(&[74.0, 0.0, 21.6], "W").unwrap();
        assert!((lng + 74.006).abs() < 1e-4, "got {lng}");

        let lat = dms_to_decimal(&[33.0, 52.0, 7.68], "S").unwrap();
        assert!((lat + 33.8688).abs() < 1e-4, "got {lat}");
    }

    #[test]
    fn dms_tolerates_short_triples() {
        assert_eq!(dms_to_decimal(&[74.0], "W"), Some(-74.0));
        assert_eq!(dms_to_decimal(&[40.0, 30.0], "N"), Some(40.5));
    }

    #[test]
    fn dms_empty_is_none() {
        assert_eq!(dms_to_decimal(&[], "N"), None);
    }

    #[test]
    fn dms_unknown_hemisphere_stays_positive() {
        assert_eq!(dms_to_decimal(&[74.0], ""), Some(74.0));
    }

    #[test]
    fn dms_nonfinite_is_none() {
        assert_eq!(dms_to_decimal(&[f64::NAN], "N"), None);
    }

    #[test]
    fn from_nonexistent_file_is_error() {
        let result = ExifData::from_file(Path::new("/nonexistent/photo.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn from_non_image_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_photo.jpg");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"plain text, no EXIF container").unwrap();

        let result = ExifData::from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("tiff"));
        assert!(!is_supported_extension("mp4"));
        assert!(!is_supported_extension(""));
    }

    #[test]
    fn has_gps_requires_both_axes() {
        let mut data = ExifData {
            latitude: Some(40.7128),
            ..Default::default()
        };
        assert!(!data.has_gps());
        data.longitude = Some(-74.006);
        assert!(data.has_gps());
    }

    #[test]
    fn serde_roundtrip() {
        let data = ExifData {
            camera_make: Some("Fujifilm".into()),
            camera_model: Some("X-T5".into()),
            date_taken: Some("2025-05-02 14:01:00".into()),
            latitude: Some(40.7128),
            longitude: Some(-74.006),
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: ExifData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.camera_model.as_deref(), Some("X-T5"));
        assert_eq!(back.latitude, Some(40.7128));
        assert_eq!(back.longitude, Some(-74.006));
    }
}
