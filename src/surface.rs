//! The host map the engine clusters for.
//!
//! A [`MapSurface`] supplies the visible region, zoom and projection, and
//! accepts view changes requested by the engine. Host notifications arrive as
//! [`SurfaceEvent`]s and are handled one at a time by
//! [`MarkerClusterer::handle_event`](crate::MarkerClusterer::handle_event).
//!
//! [`Viewport`] is a self-contained surface (center, zoom, pixel size) for
//! headless use and tests.

use crate::bounds::Projection;
use crate::cluster::ClusterId;
use crate::marker::MarkerId;
use crate::projection::WebMercator;
use markercluster_types::bounds::GeoBounds;
use markercluster_types::point::LatLng;

/// Deepest zoom a [`Viewport`] will fit bounds to.
pub const MAX_SURFACE_ZOOM: u8 = 22;

pub trait MapSurface {
    type Projection: Projection;

    /// Current visible region, or `None` before the surface has been laid out.
    fn visible_bounds(&self) -> Option<GeoBounds>;

    fn zoom(&self) -> f64;

    /// Projection at the current zoom, or `None` before layout.
    fn projection(&self) -> Option<Self::Projection>;

    /// Change the view so that `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: &GeoBounds);
}

/// Notifications delivered by the host map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The surface has been mounted and can answer layout queries.
    Mounted,
    ZoomChanged,
    /// Panning or zooming has settled.
    ViewportIdle,
    /// A draggable marker was dropped at a new position.
    MarkerDragEnd { marker: MarkerId, position: LatLng },
    /// A cluster icon was clicked.
    ClusterClicked(ClusterId),
}

/// In-memory map view using Web Mercator.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center: LatLng,
    zoom: f64,
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn is_laid_out(&self) -> bool {
        self.width > 0 && self.height > 0 && self.zoom.is_finite() && self.center.is_finite()
    }
}

impl MapSurface for Viewport {
    type Projection = WebMercator;

    fn visible_bounds(&self) -> Option<GeoBounds> {
        let projection = self.projection()?;
        let center = projection.to_pixel(self.center);
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;

        let ne = projection.to_lat_lng(center.offset(half_w, -half_h));
        let sw = projection.to_lat_lng(center.offset(-half_w, half_h));
        let bounds = GeoBounds::from_corners(sw, ne);
        bounds.is_finite().then_some(bounds)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn projection(&self) -> Option<WebMercator> {
        self.is_laid_out().then(|| WebMercator::new(self.zoom))
    }

    fn fit_bounds(&mut self, bounds: &GeoBounds) {
        if !bounds.is_finite() {
            log::warn!("Ignoring request to fit non-finite bounds");
            return;
        }

        self.center = bounds.center();
        let (width, height) = (self.width as f64, self.height as f64);
        self.zoom = (0..=MAX_SURFACE_ZOOM)
            .rev()
            .map(f64::from)
            .find(|&zoom| {
                let projection = WebMercator::new(zoom);
                let ne = projection.to_pixel(bounds.north_east());
                let sw = projection.to_pixel(bounds.south_west());
                (ne.x - sw.x).abs() <= width && (sw.y - ne.y).abs() <= height
            })
            .unwrap_or(0.0);
    }
}
