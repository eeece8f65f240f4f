//! Overlay bookkeeping for the render surface.
//!
//! The engine exclusively owns every artifact it draws. [`OverlaySet::replace`]
//! retracts the previous cycle's artifacts in full before attaching the new
//! ones, so no stale overlay survives a refresh — even a refresh that could
//! not determine any geometry.

use crate::geo::Coordinate;

/// Handle a surface returns for a drawn artifact, addressable for retraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(pub u64);

/// Style applied to one drawn polyline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolylineStyle {
    /// Color name or hex code, as understood by the surface.
    pub color: String,
    /// Dashed stroke; used for the vehicle leg.
    pub dashed: bool,
}

/// Immutable polyline palette, constructed once at startup and passed by
/// reference to drawing calls.
#[derive(Debug, Clone)]
pub struct RoutePalette {
    /// The full start→end reference route.
    pub full_route: String,
    /// The vehicle leg while actively routing to the destination.
    pub vehicle_leg_routing: String,
    /// The vehicle leg while returning to the origin.
    pub vehicle_leg_returning: String,
}

impl Default for RoutePalette {
    fn default() -> Self {
        Self {
            full_route: "green".to_string(),
            vehicle_leg_routing: "red".to_string(),
            vehicle_leg_returning: "blue".to_string(),
        }
    }
}

impl RoutePalette {
    pub fn full_route_style(&self) -> PolylineStyle {
        PolylineStyle {
            color: self.full_route.clone(),
            dashed: false,
        }
    }

    pub fn vehicle_leg_style(&self, is_routing: bool) -> PolylineStyle {
        let color = if is_routing {
            &self.vehicle_leg_routing
        } else {
            &self.vehicle_leg_returning
        };
        PolylineStyle {
            color: color.clone(),
            dashed: true,
        }
    }
}

/// One polyline queued for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub path: Vec<Coordinate>,
    pub style: PolylineStyle,
}

/// Render surface boundary, supplied by the host.
///
/// The engine only ever retracts artifacts it drew itself.
pub trait RenderSurface: Send {
    fn add_polyline(&mut self, path: &[Coordinate], style: &PolylineStyle) -> ArtifactId;
    fn remove_polyline(&mut self, id: ArtifactId);
    /// Recenter and re-zoom the viewport.
    fn set_view(&mut self, center: Coordinate, zoom: u8);
}

/// The set of artifacts currently attached to the surface.
#[derive(Debug, Default)]
pub struct OverlaySet {
    drawn: Vec<ArtifactId>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retracts everything previously drawn, then draws `layers`.
    ///
    /// The old set is always cleared first, even when `layers` is empty, so
    /// a cycle with no determinable geometry leaves nothing stale behind.
    /// Layers with an empty path are not drawn.
    pub fn replace<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, layers: Vec<OverlayLayer>) {
        for id in self.drawn.drain(..) {
            surface.remove_polyline(id);
        }
        for layer in layers {
            if layer.path.is_empty() {
                continue;
            }
            self.drawn.push(surface.add_polyline(&layer.path, &layer.style));
        }
    }

    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }
}
