//! The per-cycle display summary.

use crate::format::{format_duration, format_km};
use crate::progress::{route_progress, RouteProgress};
use crate::routing::RouteResult;
use crate::tracker::TrackingParams;

/// Snapshot published to the display sink once per cycle.
///
/// Recomputed wholesale from the two fresh route results; never patched
/// field-by-field. All distance and percent fields carry two decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    /// Full start→end route length in km.
    pub total_distance_km: String,
    /// Vehicle→target leg length in km.
    pub vehicle_to_target_km: String,
    /// Progress along the full route in percent, clamped into [0, 100].
    /// `"0.00"` when the route is undetermined; check `route_undetermined`
    /// to tell the two apart.
    pub progress_percent: String,
    /// Travel time left on the vehicle leg.
    pub estimated_time: String,
    /// Travel time for the full route.
    pub total_estimated_time: String,
    /// The full route could not be determined; hosts should show an explicit
    /// "route unknown" state instead of 0%.
    pub route_undetermined: bool,
}

/// Display boundary, supplied by the host.
pub trait DisplaySink: Send {
    fn publish(&mut self, summary: &ProgressSummary);
}

/// Builds the summary for one cycle from its two route results.
///
/// Progress is always measured against `params.end`, the full route's
/// endpoint, regardless of which way the vehicle leg points.
pub fn build_summary(
    params: &TrackingParams,
    full_route: &RouteResult,
    vehicle_leg: &RouteResult,
) -> ProgressSummary {
    let progress = route_progress(params.vehicle, params.end, full_route.distance_m);
    ProgressSummary {
        total_distance_km: format_km(full_route.distance_m),
        vehicle_to_target_km: format_km(vehicle_leg.distance_m),
        progress_percent: format!("{:.2}", progress.percent().unwrap_or(0.0)),
        estimated_time: format_duration(vehicle_leg.duration_secs),
        total_estimated_time: format_duration(full_route.duration_secs),
        route_undetermined: matches!(progress, RouteProgress::Unknown),
    }
}
