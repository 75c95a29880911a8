//! Viewport-driven clustering of map markers with an R-tree spatial index.
//!
//! ```rust
//! use markercluster::{LatLng, Marker, MarkerClusterer, SurfaceEvent, Viewport};
//!
//! let viewport = Viewport::new(LatLng::new(40.7128, -74.0060), 12.0, 1024, 768);
//! let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(viewport);
//!
//! clusterer.add_markers(
//!     vec![
//!         Marker::at(LatLng::new(40.7128, -74.0060)),
//!         Marker::at(LatLng::new(40.7130, -74.0062)),
//!         Marker::at(LatLng::new(40.7580, -73.9855)),
//!     ],
//!     true,
//! );
//! clusterer.handle_event(SurfaceEvent::Mounted);
//!
//! assert_eq!(clusterer.total_clusters(), 2);
//! ```

pub mod bounds;
pub mod builder;
pub mod cluster;
pub mod clusterer;
pub mod config;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod icon;
pub mod marker;
pub mod projection;
pub mod spatial_index;
pub mod surface;

pub use builder::ClustererBuilder;
pub use cluster::{Cluster, ClusterId};
pub use clusterer::{ClusterablePredicate, ClustererStats, MarkerClusterer, OverlayLifecycle};
pub use config::{ClustererConfig, IconStyle};
pub use error::{ClusterError, Result};
#[cfg(feature = "geojson")]
pub use geojson::markers_from_geojson;
pub use icon::{ClusterIcon, CountRenderer, IconContent, IconRenderer};
pub use marker::{Marker, MarkerId};
pub use projection::WebMercator;
pub use spatial_index::{IndexRecord, MarkerIndex};
pub use surface::{MapSurface, SurfaceEvent, Viewport};

pub use bounds::{Projection, QueryRect};
pub use markercluster_types::anchor::Anchor;
pub use markercluster_types::bounds::GeoBounds;
pub use markercluster_types::point::{LatLng, PixelPoint};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClustererBuilder, ClustererConfig, MarkerClusterer, Result};

    pub use crate::{Cluster, ClusterId, Marker, MarkerId};

    pub use crate::{GeoBounds, LatLng};

    pub use crate::{MapSurface, OverlayLifecycle, SurfaceEvent, Viewport};

    pub use crate::{IconContent, IconRenderer};
}
