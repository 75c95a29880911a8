use geo::Point;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// Stored as a `geo::Point` with `x = longitude` and `y = latitude`, so it can be
/// handed straight to `geo` algorithms. Constructors and accessors take latitude
/// first, matching how map APIs talk about positions.
///
/// # Examples
///
/// ```
/// use markercluster_types::point::LatLng;
///
/// let paris = LatLng::new(48.8566, 2.3522);
/// assert_eq!(paris.lat(), 48.8566);
/// assert_eq!(paris.lng(), 2.3522);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub point: Point<f64>,
}

impl LatLng {
    /// Create a position from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            point: Point::new(lng, lat),
        }
    }

    /// Wrap an existing `geo::Point` (x = longitude, y = latitude).
    pub fn from_point(point: Point<f64>) -> Self {
        Self { point }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.point.x()
    }

    /// Get a reference to the underlying `geo::Point`.
    pub fn as_point(&self) -> &Point<f64> {
        &self.point
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat().is_finite() && self.lng().is_finite()
    }
}

impl From<Point<f64>> for LatLng {
    fn from(point: Point<f64>) -> Self {
        Self::from_point(point)
    }
}

impl From<LatLng> for Point<f64> {
    fn from(value: LatLng) -> Self {
        value.point
    }
}

/// A projected position in world pixels at some zoom level.
///
/// `x` grows eastwards and `y` grows southwards, as on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)` pixels.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}
