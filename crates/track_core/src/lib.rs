//! Live route progress engine.
//!
//! Given a start, an end, and the current vehicle position, the engine
//! fetches the reference route and the vehicle leg from a routing provider,
//! measures how far along the reference route the vehicle is, and keeps a
//! render surface and a display sink up to date on a fixed refresh cadence.
//!
//! The host supplies the boundaries: a [`routing::RouteProvider`], a
//! [`overlay::RenderSurface`], and a [`summary::DisplaySink`]. Everything
//! between them — fetching, decoding, progress math, overlay bookkeeping,
//! and the refresh lifecycle — lives here.

pub mod config;
pub mod events;
pub mod format;
pub mod geo;
pub mod overlay;
pub mod progress;
pub mod routing;
pub mod summary;
pub mod tracker;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
