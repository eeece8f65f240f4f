//! The refresh scheduler: drives the fetch → decode → draw → publish
//! pipeline.
//!
//! Lifecycle is an explicit resource. [`Tracker::spawn`] starts the loop and
//! runs the first cycle immediately; [`TrackerHandle::update_params`]
//! abandons any in-flight cycle and starts a fresh one;
//! [`TrackerHandle::stop`] tears the loop down deterministically. Cycles are
//! serialized and carry a monotonically increasing sequence number: a cycle
//! whose fetches are overtaken by a newer snapshot (or by shutdown) is
//! discarded before it touches the surface or the sink, so a slow, stale
//! response can never overwrite a fresher one.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::TrackerConfig;
use crate::events::{noop_hook, EventHook, RouteLeg, TrackerEvent};
use crate::geo::Coordinate;
use crate::overlay::{OverlayLayer, OverlaySet, RenderSurface};
use crate::routing::{RouteError, RouteProvider, RouteResult};
use crate::summary::{build_summary, DisplaySink};

/// Consumer-supplied input snapshot, immutable per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingParams {
    pub start: Coordinate,
    pub end: Coordinate,
    pub vehicle: Coordinate,
    /// Actively routing to `end`; otherwise the vehicle leg is measured back
    /// to `start`.
    pub is_routing: bool,
}

impl TrackingParams {
    /// Endpoint of the vehicle leg for this snapshot.
    pub fn vehicle_target(&self) -> Coordinate {
        if self.is_routing {
            self.end
        } else {
            self.start
        }
    }
}

/// The engine. Owns the provider, the surface, and the sink for the lifetime
/// of the loop.
pub struct Tracker<P, S, D> {
    provider: P,
    surface: S,
    sink: D,
    hook: EventHook,
    config: TrackerConfig,
}

impl<P, S, D> Tracker<P, S, D>
where
    P: RouteProvider + 'static,
    S: RenderSurface + 'static,
    D: DisplaySink + 'static,
{
    pub fn new(provider: P, surface: S, sink: D, config: TrackerConfig) -> Self {
        Self {
            provider,
            surface,
            sink,
            hook: noop_hook(),
            config,
        }
    }

    /// Install a structured event hook.
    pub fn with_event_hook(mut self, hook: impl FnMut(&TrackerEvent) + Send + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Start tracking `params`. The first cycle runs immediately; later ones
    /// fire on the refresh timer and on every parameter change.
    pub fn spawn(self, params: TrackingParams) -> TrackerHandle {
        let (params_tx, params_rx) = watch::channel(params);
        let task = tokio::spawn(run_loop(self, params_rx));
        TrackerHandle {
            params_tx: Some(params_tx),
            task: Some(task),
        }
    }
}

/// Handle owned by the consumer for the running loop.
///
/// Dropping the handle aborts the loop; prefer [`stop`](Self::stop) for an
/// orderly shutdown.
pub struct TrackerHandle {
    params_tx: Option<watch::Sender<TrackingParams>>,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Replace the tracked snapshot. The loop abandons any in-flight cycle
    /// and recomputes immediately; the refresh timer restarts from now.
    pub fn update_params(&self, params: TrackingParams) {
        if let Some(tx) = &self.params_tx {
            // Send only fails once the loop is gone, at which point there is
            // nobody left to notify.
            let _ = tx.send(params);
        }
    }

    /// Stop the loop and wait for it to wind down. The refresh timer is
    /// cancelled and no overlay or summary mutation happens after this
    /// returns; drawn overlays are retracted on the way out.
    pub async fn stop(mut self) {
        self.params_tx.take();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

enum CycleOutcome {
    Published { route_undetermined: bool },
    Superseded,
    Closed,
}

async fn run_loop<P, S, D>(
    mut tracker: Tracker<P, S, D>,
    mut params_rx: watch::Receiver<TrackingParams>,
) where
    P: RouteProvider + 'static,
    S: RenderSurface + 'static,
    D: DisplaySink + 'static,
{
    let period = tracker.config.refresh_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut overlay = OverlaySet::new();
    let mut seq: u64 = 0;

    loop {
        let params = *params_rx.borrow_and_update();
        seq += 1;
        (tracker.hook)(&TrackerEvent::CycleStarted { seq });

        match run_cycle(&mut tracker, &mut overlay, params, &mut params_rx, seq).await {
            CycleOutcome::Published { route_undetermined } => {
                (tracker.hook)(&TrackerEvent::CyclePublished {
                    seq,
                    route_undetermined,
                });
            }
            CycleOutcome::Superseded => {
                (tracker.hook)(&TrackerEvent::CycleSuperseded { seq });
                // Fresh params are already waiting; recompute without sleeping.
                ticker.reset();
                continue;
            }
            CycleOutcome::Closed => break,
        }

        tokio::select! {
            _ = ticker.tick() => {}
            changed = params_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                ticker.reset();
            }
        }
    }

    // Deterministic teardown: release what we own before going silent.
    overlay.replace(&mut tracker.surface, Vec::new());
    (tracker.hook)(&TrackerEvent::Stopped);
}

async fn run_cycle<P, S, D>(
    tracker: &mut Tracker<P, S, D>,
    overlay: &mut OverlaySet,
    params: TrackingParams,
    params_rx: &mut watch::Receiver<TrackingParams>,
    seq: u64,
) -> CycleOutcome
where
    P: RouteProvider,
    S: RenderSurface,
    D: DisplaySink,
{
    let target = params.vehicle_target();
    let provider = &tracker.provider;
    let fetches = async {
        tokio::join!(
            provider.fetch_route(params.start, params.end),
            provider.fetch_route(params.vehicle, target),
        )
    };

    // Results apply only while this cycle is still the latest; a parameter
    // change or shutdown arriving first discards them unapplied.
    let (full, leg) = tokio::select! {
        results = fetches => results,
        changed = params_rx.changed() => {
            return match changed {
                Ok(()) => CycleOutcome::Superseded,
                Err(_) => CycleOutcome::Closed,
            };
        }
    };

    let full = absorb(&mut tracker.hook, seq, RouteLeg::Full, full);
    let leg = absorb(&mut tracker.hook, seq, RouteLeg::Vehicle, leg);

    let mut layers = Vec::new();
    if !full.geometry.is_empty() {
        layers.push(OverlayLayer {
            path: full.geometry.clone(),
            style: tracker.config.palette.full_route_style(),
        });
    }
    if !leg.geometry.is_empty() {
        layers.push(OverlayLayer {
            path: leg.geometry.clone(),
            style: tracker.config.palette.vehicle_leg_style(params.is_routing),
        });
    }
    overlay.replace(&mut tracker.surface, layers);
    tracker
        .surface
        .set_view(params.vehicle, tracker.config.recenter_zoom);

    let summary = build_summary(&params, &full, &leg);
    let route_undetermined = summary.route_undetermined;
    tracker.sink.publish(&summary);

    CycleOutcome::Published { route_undetermined }
}

/// The fail-soft boundary: any provider error becomes the zero result, with
/// a warning and a structured event. Routing outages degrade the display;
/// they never stop the loop, which retries on the next tick.
fn absorb(
    hook: &mut EventHook,
    seq: u64,
    leg: RouteLeg,
    result: Result<RouteResult, RouteError>,
) -> RouteResult {
    match result {
        Ok(route) => route,
        Err(err) => {
            tracing::warn!(cycle = seq, leg = ?leg, error = %err, "route fetch degraded to zero result");
            (hook)(&TrackerEvent::FetchDegraded {
                seq,
                leg,
                reason: err.to_string(),
            });
            RouteResult::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::test_helpers::{
        test_end, test_params, test_route, test_start, test_vehicle, ChannelSink,
        RecordingSurface, ScriptedRouteProvider,
    };

    fn config() -> TrackerConfig {
        TrackerConfig::default()
    }

    fn collecting_hook(events: Arc<Mutex<Vec<TrackerEvent>>>) -> impl FnMut(&TrackerEvent) + Send {
        move |event| events.lock().expect("events lock").push(event.clone())
    }

    /// Spins until the provider has seen `count` calls. With paused time the
    /// loop itself keeps the runtime busy, so no auto-advance happens here.
    async fn wait_for_calls(provider: &ScriptedRouteProvider, count: usize) {
        while provider.calls().len() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_cycle_fetches_both_legs_and_publishes() {
        let provider = ScriptedRouteProvider::new();
        provider.script(
            test_start(),
            test_end(),
            test_route(8_543.0, 5_400.0, vec![test_start(), test_end()]),
        );
        provider.script(
            test_vehicle(),
            test_end(),
            test_route(4_210.0, 660.0, vec![test_vehicle(), test_end()]),
        );
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();

        let handle = Tracker::new(provider.clone(), surface.clone(), sink, config())
            .spawn(test_params(true));

        let summary = summaries.recv().await.expect("first summary");
        assert_eq!(summary.total_distance_km, "8.54");
        assert_eq!(summary.vehicle_to_target_km, "4.21");
        assert_eq!(summary.estimated_time, "0h 11m");
        assert_eq!(summary.total_estimated_time, "1h 30m");
        assert!(!summary.route_undetermined);

        let calls = provider.calls();
        assert_eq!(calls[0], (test_start(), test_end()));
        assert_eq!(calls[1], (test_vehicle(), test_end()));

        // Full route solid, vehicle leg dashed, recentered on the vehicle.
        let attached = surface.attached();
        assert_eq!(attached.len(), 2);
        assert!(!attached[0].2.dashed);
        assert!(attached[1].2.dashed);
        assert_eq!(surface.views(), vec![(test_vehicle(), 10)]);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn returning_vehicles_measure_the_leg_against_start() {
        let provider = ScriptedRouteProvider::new();
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();

        let handle = Tracker::new(provider.clone(), surface, sink, config())
            .spawn(test_params(false));

        summaries.recv().await.expect("first summary");
        assert_eq!(provider.calls()[1], (test_vehicle(), test_start()));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timer_refires_and_replaces_the_overlay() {
        let provider = ScriptedRouteProvider::new();
        provider.script(
            test_start(),
            test_end(),
            test_route(8_543.0, 5_400.0, vec![test_start(), test_end()]),
        );
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();

        let handle = Tracker::new(provider.clone(), surface.clone(), sink, config())
            .spawn(test_params(true));

        summaries.recv().await.expect("first summary");
        let first_ids: Vec<_> = surface.attached().iter().map(|(id, _, _)| *id).collect();

        // Paused time fast-forwards through the 60s interval on its own.
        summaries.recv().await.expect("second summary");
        assert!(provider.calls().len() >= 4);

        let attached = surface.attached();
        assert_eq!(attached.len(), 1);
        assert!(first_ids.iter().all(|id| surface.removed().contains(id)));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn parameter_change_triggers_an_immediate_cycle() {
        let provider = ScriptedRouteProvider::new();
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();

        let handle = Tracker::new(provider.clone(), surface, sink, config())
            .spawn(test_params(true));
        summaries.recv().await.expect("first summary");

        let moved = Coordinate::new(4.64, -74.08).expect("valid coordinate");
        let mut params = test_params(true);
        params.vehicle = moved;
        handle.update_params(params);

        summaries.recv().await.expect("summary after change");
        let calls = provider.calls();
        assert_eq!(calls[calls.len() - 1], (moved, test_end()));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stale_cycles_are_discarded_before_applying_anything() {
        let provider = ScriptedRouteProvider::new();
        provider.set_delay(Duration::from_secs(30));
        provider.script(
            test_start(),
            test_end(),
            test_route(8_543.0, 5_400.0, vec![test_start(), test_end()]),
        );
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        let moved = Coordinate::new(4.62, -74.09).expect("valid coordinate");
        let mut newer = test_params(true);
        newer.vehicle = moved;

        let handle = Tracker::new(provider.clone(), surface.clone(), sink, config())
            .with_event_hook(collecting_hook(events.clone()))
            .spawn(test_params(true));

        // Let cycle 1 start its fetches, then overtake it mid-flight.
        wait_for_calls(&provider, 2).await;
        handle.update_params(newer);

        let summary = summaries.recv().await.expect("summary");
        // Only the newer cycle ever published, with the newer vehicle leg.
        assert_eq!(summary.total_distance_km, "8.54");
        let calls = provider.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3], (moved, test_end()));

        let events = events.lock().expect("events lock");
        assert!(events.contains(&TrackerEvent::CycleSuperseded { seq: 1 }));
        assert!(events
            .iter()
            .all(|event| !matches!(event, TrackerEvent::CyclePublished { seq: 1, .. })));
        assert!(events.contains(&TrackerEvent::CyclePublished {
            seq: 2,
            route_undetermined: false,
        }));
        drop(events);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failures_degrade_to_the_undetermined_summary() {
        let provider = ScriptedRouteProvider::new();
        provider.fail_all();
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        let handle = Tracker::new(provider, surface.clone(), sink, config())
            .with_event_hook(collecting_hook(events.clone()))
            .spawn(test_params(true));

        let summary = summaries.recv().await.expect("degraded summary");
        assert_eq!(summary.total_distance_km, "0.00");
        assert_eq!(summary.vehicle_to_target_km, "0.00");
        assert_eq!(summary.progress_percent, "0.00");
        assert_eq!(summary.estimated_time, "0h 0m");
        assert_eq!(summary.total_estimated_time, "0h 0m");
        assert!(summary.route_undetermined);

        // Nothing drawable, so nothing drawn; the recenter still happens.
        assert!(surface.attached().is_empty());
        assert_eq!(surface.views().len(), 1);

        let degraded = events
            .lock()
            .expect("events lock")
            .iter()
            .filter(|event| matches!(event, TrackerEvent::FetchDegraded { .. }))
            .count();
        assert_eq!(degraded, 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_retracts_overlays_and_ceases_publishing() {
        let provider = ScriptedRouteProvider::new();
        provider.script(
            test_start(),
            test_end(),
            test_route(8_543.0, 5_400.0, vec![test_start(), test_end()]),
        );
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        let handle = Tracker::new(provider, surface.clone(), sink, config())
            .with_event_hook(collecting_hook(events.clone()))
            .spawn(test_params(true));

        summaries.recv().await.expect("first summary");
        handle.stop().await;

        assert!(surface.attached().is_empty());
        assert_eq!(
            events.lock().expect("events lock").last(),
            Some(&TrackerEvent::Stopped)
        );
        // The sink died with the loop; no further summaries can arrive.
        assert!(summaries.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_inflight_fetches_applies_nothing() {
        let provider = ScriptedRouteProvider::new();
        provider.set_delay(Duration::from_secs(30));
        let surface = RecordingSurface::new();
        let (sink, mut summaries) = ChannelSink::new();

        let handle = Tracker::new(provider.clone(), surface.clone(), sink, config())
            .spawn(test_params(true));

        wait_for_calls(&provider, 2).await;
        handle.stop().await;

        assert!(summaries.recv().await.is_none());
        assert!(surface.attached().is_empty());
        assert!(surface.views().is_empty());
    }
}
