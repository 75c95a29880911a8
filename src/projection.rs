//! Spherical Web Mercator, the projection used by slippy-map tile providers.

use crate::bounds::Projection;
use markercluster_types::point::{LatLng, PixelPoint};
use std::f64::consts::PI;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LAT: f64 = 85.051_128_78;

/// Side length in pixels of one map tile.
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Web Mercator projection into world pixels at a (possibly fractional) zoom.
///
/// At zoom `z` the world is `tile_size * 2^z` pixels wide, with the origin at
/// the north-west corner (lat `MAX_LAT`, lng -180).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    zoom: f64,
    tile_size: f64,
}

impl WebMercator {
    pub fn new(zoom: f64) -> Self {
        Self::with_tile_size(zoom, DEFAULT_TILE_SIZE)
    }

    pub fn with_tile_size(zoom: f64, tile_size: f64) -> Self {
        Self { zoom, tile_size }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Width and height of the world in pixels.
    pub fn world_size(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }
}

impl Projection for WebMercator {
    fn to_pixel(&self, position: LatLng) -> PixelPoint {
        let size = self.world_size();
        let lat_rad = position.lat().clamp(-MAX_LAT, MAX_LAT).to_radians();

        let x = (position.lng() + 180.0) / 360.0 * size;
        let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;
        PixelPoint::new(x, y)
    }

    fn to_lat_lng(&self, pixel: PixelPoint) -> LatLng {
        let size = self.world_size();

        let lng = pixel.x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * pixel.y / size)).sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }
}
