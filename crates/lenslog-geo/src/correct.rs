/// Latitude range that roughly covers the continental United States.
///
/// Inside this range a positive longitude is assumed to be a western
/// coordinate that lost its sign on the way into storage, not a real
/// location in Asia. Outside it nothing can be concluded, so values pass
/// through untouched even when they look wrong.
pub const CONUS_LAT_MIN: f64 = 24.0;
pub const CONUS_LAT_MAX: f64 = 50.0;

/// Flip a mis-signed longitude back to the western hemisphere.
///
/// The latitude is returned unchanged in all cases. The flip only fires for
/// a strictly positive longitude, so applying the function twice gives the
/// same result as applying it once.
pub fn correct_coordinates(latitude: f64, longitude: f64) -> (f64, f64) {
    if (CONUS_LAT_MIN..=CONUS_LAT_MAX).contains(&latitude) && longitude > 0.0 {
        (latitude, -longitude)
    } else {
        (latitude, longitude)
    }
}

/// Apply the sign correction to a `"lat,lng"` string.
///
/// A parseable string comes back re-serialized from the numeric values,
/// corrected or not. Anything that does not parse cleanly into exactly two
/// finite numbers is returned verbatim; a half-filled or garbled value is
/// not worth losing over a cleanup pass.
pub fn correct_coordinate_string(raw: &str) -> String {
    let Some((lat_raw, lng_raw)) = raw.split_once(',') else {
        return raw.to_string();
    };
    let (Ok(latitude), Ok(longitude)) = (
        lat_raw.trim().parse::<f64>(),
        lng_raw.trim().parse::<f64>(),
    ) else {
        return raw.to_string();
    };
    // "NaN" and "inf" parse successfully but are not coordinates.
    if !latitude.is_finite() || !longitude.is_finite() {
        return raw.to_string();
    }

    let (latitude, longitude) = correct_coordinates(latitude, longitude);
    format!("{latitude},{longitude}")
}
