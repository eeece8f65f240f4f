use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct OsrmRouteResponse {
    pub(super) code: String,
    #[serde(default)]
    pub(super) routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
pub(super) struct OsrmRoute {
    /// Total distance in meters.
    pub(super) distance: f64,
    /// Total duration in seconds.
    pub(super) duration: f64,
    #[serde(default)]
    pub(super) geometry: Option<OsrmRouteGeometry>,
    #[serde(default)]
    pub(super) legs: Vec<OsrmLeg>,
}

/// Route-level geometry. Shape depends on the `geometries` request option:
/// GeoJSON yields an object with `[lng, lat]` pairs, polyline yields one
/// encoded string.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum OsrmRouteGeometry {
    GeoJson { coordinates: Vec<[f64; 2]> },
    Encoded(String),
}

#[derive(Deserialize)]
pub(super) struct OsrmLeg {
    #[serde(default)]
    pub(super) steps: Vec<OsrmStep>,
}

#[derive(Deserialize)]
pub(super) struct OsrmStep {
    /// Encoded polyline fragment; absent when step geometry was not requested.
    #[serde(default)]
    pub(super) geometry: Option<String>,
}
