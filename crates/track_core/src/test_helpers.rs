//! Shared fakes and fixtures for engine tests.
//!
//! The provider, surface, and sink here stand in for the real boundaries so
//! scheduler behavior can be asserted without a network or a map. All of
//! them hand out cloneable handles backed by shared state, because the
//! originals move into the refresh task while the test keeps asserting.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::geo::Coordinate;
use crate::overlay::{ArtifactId, PolylineStyle, RenderSurface};
use crate::routing::{RouteError, RouteProvider, RouteResult};
use crate::summary::{DisplaySink, ProgressSummary};
use crate::tracker::TrackingParams;

/// Route origin of the Bogotá demo scenario.
pub fn test_start() -> Coordinate {
    Coordinate::new(4.676979, -74.062062).expect("test start should be valid")
}

/// Route destination of the Bogotá demo scenario.
pub fn test_end() -> Coordinate {
    Coordinate::new(4.609288, -74.09927).expect("test end should be valid")
}

/// Vehicle position between start and end.
pub fn test_vehicle() -> Coordinate {
    Coordinate::new(4.651721, -74.078671).expect("test vehicle should be valid")
}

/// The demo scenario as tracking params.
pub fn test_params(is_routing: bool) -> TrackingParams {
    TrackingParams {
        start: test_start(),
        end: test_end(),
        vehicle: test_vehicle(),
        is_routing,
    }
}

/// A route result with the given totals and geometry.
pub fn test_route(distance_m: f64, duration_secs: f64, geometry: Vec<Coordinate>) -> RouteResult {
    RouteResult {
        distance_m,
        duration_secs,
        geometry,
    }
}

#[derive(Default)]
struct ProviderState {
    routes: Mutex<Vec<((Coordinate, Coordinate), RouteResult)>>,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
    fail_all: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
}

/// Scripted routing backend: canned results per coordinate pair, optional
/// artificial latency, optional blanket failure, and a call log.
///
/// Unscripted pairs resolve to the zero result.
#[derive(Clone, Default)]
pub struct ScriptedRouteProvider {
    state: Arc<ProviderState>,
}

impl ScriptedRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for one ordered pair.
    pub fn script(&self, origin: Coordinate, destination: Coordinate, result: RouteResult) {
        self.state
            .routes
            .lock()
            .expect("routes lock")
            .push(((origin, destination), result));
    }

    /// Make every fetch fail from now on.
    pub fn fail_all(&self) {
        *self.state.fail_all.lock().expect("fail_all lock") = true;
    }

    /// Delay every fetch by `delay` before resolving.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().expect("delay lock") = Some(delay);
    }

    /// Every (origin, destination) pair fetched so far, in call order.
    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.state.calls.lock().expect("calls lock").clone()
    }
}

impl RouteProvider for ScriptedRouteProvider {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteResult, RouteError> {
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .push((origin, destination));

        let delay = *self.state.delay.lock().expect("delay lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.state.fail_all.lock().expect("fail_all lock") {
            return Err(RouteError::Api("scripted failure".to_string()));
        }

        let routes = self.state.routes.lock().expect("routes lock");
        Ok(routes
            .iter()
            .find(|((o, d), _)| *o == origin && *d == destination)
            .map(|(_, result)| result.clone())
            .unwrap_or_else(RouteResult::zero))
    }
}

#[derive(Default)]
struct SurfaceState {
    next_id: u64,
    attached: Vec<(ArtifactId, usize, PolylineStyle)>,
    removed: Vec<ArtifactId>,
    views: Vec<(Coordinate, u8)>,
}

/// Recording render surface: remembers what is attached, what was removed,
/// and every viewport change.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently attached artifacts as (id, point count, style).
    pub fn attached(&self) -> Vec<(ArtifactId, usize, PolylineStyle)> {
        self.state.lock().expect("surface lock").attached.clone()
    }

    /// Every artifact ever removed.
    pub fn removed(&self) -> Vec<ArtifactId> {
        self.state.lock().expect("surface lock").removed.clone()
    }

    /// Every viewport change as (center, zoom).
    pub fn views(&self) -> Vec<(Coordinate, u8)> {
        self.state.lock().expect("surface lock").views.clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn add_polyline(&mut self, path: &[Coordinate], style: &PolylineStyle) -> ArtifactId {
        let mut state = self.state.lock().expect("surface lock");
        state.next_id += 1;
        let id = ArtifactId(state.next_id);
        state.attached.push((id, path.len(), style.clone()));
        id
    }

    fn remove_polyline(&mut self, id: ArtifactId) {
        let mut state = self.state.lock().expect("surface lock");
        state.attached.retain(|(attached, _, _)| *attached != id);
        state.removed.push(id);
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.state
            .lock()
            .expect("surface lock")
            .views
            .push((center, zoom));
    }
}

/// Display sink that forwards every published summary over a channel, so
/// async tests can await the next publication.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressSummary>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressSummary>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelSink {
    fn publish(&mut self, summary: &ProgressSummary) {
        let _ = self.tx.send(summary.clone());
    }
}
