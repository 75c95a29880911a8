//! Geographic region math.
//!
//! A cluster's catchment is a fixed number of *pixels* around its center, but
//! the index works in degrees. These helpers go through the map projection to
//! turn a pixel margin into degrees at the current zoom, so results must be
//! recomputed whenever the zoom changes.

use markercluster_types::bounds::GeoBounds;
use markercluster_types::point::{LatLng, PixelPoint};

/// Conversion between geographic and pixel coordinates at one zoom level.
pub trait Projection {
    fn to_pixel(&self, position: LatLng) -> PixelPoint;

    fn to_lat_lng(&self, pixel: PixelPoint) -> LatLng;
}

impl<P: Projection + ?Sized> Projection for &P {
    fn to_pixel(&self, position: LatLng) -> PixelPoint {
        (**self).to_pixel(position)
    }

    fn to_lat_lng(&self, pixel: PixelPoint) -> LatLng {
        (**self).to_lat_lng(pixel)
    }
}

/// Query parameters for rectangle searches on the marker index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRect {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl QueryRect {
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.min_lat, self.min_lng, self.max_lat, self.max_lng]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Same rectangle with `min <= max` on both axes.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.min_lat.min(self.max_lat),
            self.min_lng.min(self.max_lng),
            self.min_lat.max(self.max_lat),
            self.min_lng.max(self.max_lng),
        )
    }
}

/// Grow `region` outward by `grid_size` pixels on every side.
///
/// Both corners are projected to pixels, pushed out by the margin (north-east
/// goes up and right, south-west goes down and left), projected back, and the
/// result is unioned with the original region. The union keeps the region
/// intact where the projection clamps, e.g. near the poles.
pub fn expand<P>(region: &GeoBounds, grid_size: f64, projection: &P) -> GeoBounds
where
    P: Projection + ?Sized,
{
    let ne = projection
        .to_pixel(region.north_east())
        .offset(grid_size, -grid_size);
    let sw = projection
        .to_pixel(region.south_west())
        .offset(-grid_size, grid_size);

    region
        .extend(&projection.to_lat_lng(ne))
        .extend(&projection.to_lat_lng(sw))
}

/// Catchment rectangle of a single position: the point grown by `grid_size` pixels.
pub fn expand_point<P>(position: LatLng, grid_size: f64, projection: &P) -> GeoBounds
where
    P: Projection + ?Sized,
{
    expand(
        &GeoBounds::from_corners(position, position),
        grid_size,
        projection,
    )
}

/// Normalize a region into the `[min_lat, min_lng, max_lat, max_lng]` form the
/// index queries with.
pub fn to_query_rect(bounds: &GeoBounds) -> QueryRect {
    let a = bounds.south_west();
    let b = bounds.north_east();
    QueryRect::new(
        a.lat().min(b.lat()),
        a.lng().min(b.lng()),
        a.lat().max(b.lat()),
        a.lng().max(b.lng()),
    )
}
