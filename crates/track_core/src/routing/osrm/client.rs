use std::time::Duration;

use reqwest::{Client, Url};

use crate::geo::Coordinate;
use crate::routing::{RouteProvider, RouteResult};

use super::error::RouteError;
use super::parser::parse_route_response;
use super::response::OsrmRouteResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Which geometry shape to request from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Full coordinate arrays on the route (`geometries=geojson`).
    #[default]
    GeoJson,
    /// Encoded polyline strings on every step (`geometries=polyline`).
    Polyline,
}

impl GeometryFormat {
    fn query_value(self) -> &'static str {
        match self {
            Self::GeoJson => "geojson",
            Self::Polyline => "polyline",
        }
    }
}

/// Thin HTTP client for the OSRM `/route` service.
///
/// Stateless and reentrant: `fetch_route` takes `&self`, so one client can
/// serve the refresh loop's concurrent full-route and vehicle-leg queries.
#[derive(Debug, Clone)]
pub struct OsrmRouteClient {
    client: Client,
    endpoint: String,
    format: GeometryFormat,
}

impl OsrmRouteClient {
    /// Create a client for the given endpoint
    /// (e.g. `https://router.project-osrm.org`).
    pub fn new(endpoint: &str, format: GeometryFormat) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build OSRM client");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            format,
        }
    }

    // The service expects lng,lat pairs in the path even though the engine
    // stores (lat, lng).
    pub(super) fn route_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Url, RouteError> {
        let base = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.endpoint,
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat(),
        );
        let mut url = Url::parse(&base)
            .map_err(|err| RouteError::Api(format!("failed to build route URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("alternatives", "false")
            .append_pair("steps", "true")
            .append_pair("overview", "full")
            .append_pair("geometries", self.format.query_value());
        Ok(url)
    }
}

impl RouteProvider for OsrmRouteClient {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteResult, RouteError> {
        // Same point both ways: nothing to route, skip the network call.
        if origin == destination {
            return Ok(RouteResult::zero());
        }

        let url = self.route_url(origin, destination)?;
        tracing::debug!(%url, "requesting route");

        let response = self.client.get(url).send().await.map_err(RouteError::Http)?;
        if !response.status().is_success() {
            return Err(RouteError::Api(format!("status {}", response.status())));
        }

        let parsed: OsrmRouteResponse = response.json().await.map_err(RouteError::Json)?;
        parse_route_response(parsed)
    }
}
