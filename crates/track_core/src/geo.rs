//! Geographic primitives: validated coordinates and great-circle distance.

use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in meters used by the haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated (latitude, longitude) pair in decimal degrees.
///
/// Latitude is within [-90, 90], longitude within [-180, 180], both finite.
/// Validation happens only at construction, so every `Coordinate` inside the
/// engine is known-good. The internal axis order is (lat, lng) throughout;
/// providers that speak (lng, lat) are normalized at the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

/// Errors from constructing or parsing a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate components must be finite")]
    NotFinite,
    #[error("expected \"lat,lng\"")]
    Malformed,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s.split_once(',').ok_or(CoordinateError::Malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| CoordinateError::Malformed)?;
        let lng: f64 = lng.trim().parse().map_err(|_| CoordinateError::Malformed)?;
        Self::new(lat, lng)
    }
}

/// Haversine distance in meters between two coordinates on a spherical Earth.
///
/// Pure and symmetric; identical points yield exactly 0.
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat().to_radians(), a.lng().to_radians());
    let (lat2, lon2) = (b.lat().to_radians(), b.lng().to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
