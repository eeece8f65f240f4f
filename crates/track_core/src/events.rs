//! Structured engine events for host observability.
//!
//! The refresh loop reports what it does through a plain callback so hosts
//! can forward events to metrics or logging without the engine depending on
//! either. Diagnostics for humans go through `tracing`; the hook carries the
//! structured stream.

/// Which of the two per-cycle fetches an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLeg {
    /// The full start→end reference route.
    Full,
    /// The vehicle→target leg.
    Vehicle,
}

/// One structured event from the refresh loop.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A refresh cycle started. `seq` increases monotonically per tracker.
    CycleStarted { seq: u64 },
    /// A leg fetch failed and was degraded to the zero result.
    FetchDegraded {
        seq: u64,
        leg: RouteLeg,
        reason: String,
    },
    /// The cycle's fetches were overtaken by a newer snapshot; results were
    /// discarded without touching the surface or the sink.
    CycleSuperseded { seq: u64 },
    /// The cycle replaced the overlay and published its summary.
    CyclePublished { seq: u64, route_undetermined: bool },
    /// The tracker stopped; nothing is published after this.
    Stopped,
}

/// Observer callback invoked synchronously by the refresh loop.
pub type EventHook = Box<dyn FnMut(&TrackerEvent) + Send>;

/// The default hook: drops every event.
pub fn noop_hook() -> EventHook {
    Box::new(|_| {})
}
