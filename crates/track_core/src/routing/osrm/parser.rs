use crate::geo::Coordinate;
use crate::routing::RouteResult;

use super::error::RouteError;
use super::polyline::decode_polyline;
use super::response::{OsrmLeg, OsrmRouteGeometry, OsrmRouteResponse};

/// Normalizes a `/route` response into a [`RouteResult`].
///
/// Only the first returned route is used. Geometry strategy is picked by
/// shape: a GeoJSON coordinate array on the route wins; otherwise the
/// per-step encoded polylines are decoded and concatenated in order.
pub(super) fn parse_route_response(resp: OsrmRouteResponse) -> Result<RouteResult, RouteError> {
    if resp.code != "Ok" {
        return Err(RouteError::Api(resp.code));
    }

    let route = resp.routes.into_iter().next().ok_or(RouteError::NoRoute)?;

    let geometry = match route.geometry {
        Some(OsrmRouteGeometry::GeoJson { coordinates }) => decode_geojson(&coordinates),
        _ => decode_steps(&route.legs),
    };

    Ok(RouteResult {
        distance_m: route.distance.max(0.0),
        duration_secs: route.duration.max(0.0),
        geometry,
    })
}

/// GeoJSON order is [lng, lat]; the engine stores (lat, lng).
fn decode_geojson(coordinates: &[[f64; 2]]) -> Vec<Coordinate> {
    coordinates
        .iter()
        .filter_map(|pair| Coordinate::new(pair[1], pair[0]).ok())
        .collect()
}

/// Concatenates every step's decoded fragment across all legs, in original
/// order. Steps without geometry are skipped.
fn decode_steps(legs: &[OsrmLeg]) -> Vec<Coordinate> {
    let mut points = Vec::new();
    for leg in legs {
        for step in &leg.steps {
            let Some(encoded) = step.geometry.as_deref() else {
                continue;
            };
            points.extend(decode_polyline(encoded));
        }
    }
    points
}
