//! # markercluster-types
//!
//! Core geometry types shared by the markercluster engine and map bindings.
//!
//! - **Point types**: [`LatLng`](point::LatLng) for geographic positions,
//!   [`PixelPoint`](point::PixelPoint) for projected screen coordinates
//! - **Bounds**: [`GeoBounds`](bounds::GeoBounds), a closed lat/lng rectangle
//! - **Anchors**: [`Anchor`](anchor::Anchor), icon alignment with bit-flag semantics
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use markercluster_types::bounds::GeoBounds;
//! use markercluster_types::point::LatLng;
//!
//! let nyc = LatLng::new(40.7128, -74.0060);
//! let bounds = GeoBounds::from_corners(LatLng::new(40.0, -75.0), LatLng::new(41.0, -73.0));
//! assert!(bounds.contains(&nyc));
//! ```

pub mod anchor;
pub mod bounds;
pub mod point;

pub use geo;
