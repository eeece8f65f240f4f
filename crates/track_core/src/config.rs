//! Engine configuration, injected once at startup.

use std::time::Duration;

use crate::overlay::RoutePalette;
use crate::routing::GeometryFormat;

/// Public demo OSRM endpoint, used when the host configures nothing else.
pub const DEFAULT_ENDPOINT: &str = "https://router.project-osrm.org";

/// How often a running tracker refreshes by default.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Immutable tracker configuration.
///
/// Constructed once by the host and handed to the engine by value; nothing
/// in here changes while the tracker runs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the routing service.
    pub endpoint: String,
    /// Cadence of the refresh timer.
    pub refresh_interval: Duration,
    /// Zoom applied when recentering on the vehicle.
    pub recenter_zoom: u8,
    /// Geometry shape requested from the routing service.
    pub geometry_format: GeometryFormat,
    /// Polyline colors for the drawn overlays.
    pub palette: RoutePalette,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            recenter_zoom: 10,
            geometry_format: GeometryFormat::GeoJson,
            palette: RoutePalette::default(),
        }
    }
}
