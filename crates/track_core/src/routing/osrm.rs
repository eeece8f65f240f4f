//! OSRM `/route` client: distance, duration, and geometry for an ordered
//! coordinate pair.
//!
//! [`client`] issues the HTTP request, [`response`] models the JSON,
//! [`parser`] normalizes the first returned route into a
//! [`RouteResult`](crate::routing::RouteResult), and [`polyline`] decodes
//! per-step encoded geometry. The two geometry shapes the service can return
//! (GeoJSON coordinate arrays vs. encoded polylines on every step) are told
//! apart by response shape, not by configuration.

mod client;
mod error;
mod parser;
mod polyline;
mod response;


pub use client::{GeometryFormat, OsrmRouteClient};
pub use error::RouteError;
pub use polyline::decode_polyline;
