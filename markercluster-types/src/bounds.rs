use crate::point::LatLng;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A closed, axis-aligned rectangle in geographic coordinates.
///
/// This is a wrapper around `geo::Rect` (x = longitude, y = latitude). The
/// underlying rect always keeps `min <= max` on both axes, whatever order the
/// corners were given in. Antimeridian-crossing regions are not represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// The underlying geometric rectangle
    pub rect: Rect<f64>,
}

impl GeoBounds {
    /// Create bounds from explicit latitude/longitude extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use markercluster_types::bounds::GeoBounds;
    ///
    /// let bounds = GeoBounds::new(40.7, -74.0, 40.8, -73.9);
    /// assert_eq!(bounds.min_lat(), 40.7);
    /// assert_eq!(bounds.max_lng(), -73.9);
    /// ```
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_lng, y: min_lat },
                geo::coord! { x: max_lng, y: max_lat },
            ),
        }
    }

    /// Create bounds spanning two arbitrary corner positions.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self::new(a.lat(), a.lng(), b.lat(), b.lng())
    }

    /// Create bounds from a `geo::Rect`.
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self { rect }
    }

    /// Smallest bounds enclosing every position, or `None` for an empty input.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let seed = Self::from_corners(first, first);
        Some(iter.fold(seed, |acc, p| acc.extend(&p)))
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn min_lng(&self) -> f64 {
        self.rect.min().x
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    pub fn max_lng(&self) -> f64 {
        self.rect.max().x
    }

    /// South-west corner.
    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.min_lat(), self.min_lng())
    }

    /// North-east corner.
    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.max_lat(), self.max_lng())
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat() + self.max_lat()) / 2.0,
            (self.min_lng() + self.max_lng()) / 2.0,
        )
    }

    /// Check whether a position lies within the bounds, edges included.
    pub fn contains(&self, position: &LatLng) -> bool {
        position.lat() >= self.min_lat()
            && position.lat() <= self.max_lat()
            && position.lng() >= self.min_lng()
            && position.lng() <= self.max_lng()
    }

    /// Check if these bounds intersect with another.
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        !(self.max_lng() < other.min_lng()
            || self.min_lng() > other.max_lng()
            || self.max_lat() < other.min_lat()
            || self.min_lat() > other.max_lat())
    }

    /// Grow the bounds just enough to include `position`.
    pub fn extend(&self, position: &LatLng) -> Self {
        Self::new(
            self.min_lat().min(position.lat()),
            self.min_lng().min(position.lng()),
            self.max_lat().max(position.lat()),
            self.max_lng().max(position.lng()),
        )
    }

    /// Smallest bounds covering both `self` and `other`.
    pub fn union(&self, other: &GeoBounds) -> Self {
        self.extend(&other.south_west()).extend(&other.north_east())
    }

    /// All four extents are finite numbers.
    pub fn is_finite(&self) -> bool {
        [
            self.min_lat(),
            self.min_lng(),
            self.max_lat(),
            self.max_lng(),
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
