//! Progress of a moving point along a reference route.

use crate::geo::{distance_m, Coordinate};

/// Outcome of a progress computation.
///
/// `Unknown` means the reference route has no usable distance, which is a
/// different display state from a vehicle that is genuinely at 0%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteProgress {
    /// The reference route could not be determined; no percentage exists.
    Unknown,
    /// Percent of the reference route covered, clamped into [0, 100].
    Percent(f64),
}

impl RouteProgress {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Unknown => None,
            Self::Percent(value) => Some(*value),
        }
    }
}

/// Fraction of the reference route already covered by `vehicle`, measured
/// via the remaining great-circle distance to `end`.
///
/// `total_distance_m` is the full route's distance, not the vehicle leg's.
/// A non-positive or non-finite total yields [`RouteProgress::Unknown`]
/// rather than dividing by zero; off-route vehicles that would compute
/// outside [0, 100] are clamped.
pub fn route_progress(
    vehicle: Coordinate,
    end: Coordinate,
    total_distance_m: f64,
) -> RouteProgress {
    if !total_distance_m.is_finite() || total_distance_m <= 0.0 {
        return RouteProgress::Unknown;
    }
    let covered = total_distance_m - distance_m(vehicle, end);
    RouteProgress::Percent((covered / total_distance_m * 100.0).clamp(0.0, 100.0))
}
