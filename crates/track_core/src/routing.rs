//! Pluggable route providers: trait abstraction over routing backends.
//!
//! The engine consumes routing exclusively through [`RouteProvider`]; the
//! shipped implementation is [`OsrmRouteClient`]. Provider failures are
//! represented as [`RouteError`] here and degraded to [`RouteResult::zero`]
//! by the refresh loop, so a routing outage can never take the tracker down
//! with it.

pub mod osrm;

use std::future::Future;

use crate::geo::Coordinate;

pub use osrm::{GeometryFormat, OsrmRouteClient, RouteError};

/// Result of a route query between two coordinates.
///
/// A zero distance and duration with empty geometry is the "could not be
/// determined" terminal, not an error. Results are produced fresh per query
/// and never cached across refresh cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
    /// Road-network distance in meters.
    pub distance_m: f64,
    /// Travel time in seconds.
    pub duration_secs: f64,
    /// Ordered (lat, lng) waypoints along the road.
    pub geometry: Vec<Coordinate>,
}

impl RouteResult {
    /// The degraded terminal: nothing could be determined.
    pub fn zero() -> Self {
        Self {
            distance_m: 0.0,
            duration_secs: 0.0,
            geometry: Vec::new(),
        }
    }

    /// True when the route could not be determined.
    pub fn is_undetermined(&self) -> bool {
        self.distance_m <= 0.0
    }
}

/// Trait for routing backends.
///
/// Implementations must be stateless and reentrant: the refresh loop issues
/// two queries concurrently against one shared provider. `Send + Sync` so a
/// provider can move into the refresh task and be borrowed by both fetches.
pub trait RouteProvider: Send + Sync {
    /// Compute a route for the ordered pair `origin` → `destination`.
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<RouteResult, RouteError>> + Send;
}
