//! Engine builder for flexible configuration
//!
//! Collects plain settings plus the behavioural hooks that cannot live in a
//! serialized [`ClustererConfig`]: the eligibility predicate and the icon
//! renderer.

use crate::clusterer::{ClusterablePredicate, MarkerClusterer};
use crate::config::{ClustererConfig, IconStyle};
use crate::error::Result;
use crate::icon::{CountRenderer, IconRenderer};
use crate::marker::Marker;
use crate::surface::MapSurface;

/// Builder for a [`MarkerClusterer`].
///
/// # Example
///
/// ```rust
/// use markercluster::{ClustererBuilder, IconContent, LatLng, Marker, SurfaceEvent, Viewport};
///
/// let viewport = Viewport::new(LatLng::new(48.85, 2.35), 12.0, 1024, 768);
/// let mut clusterer = ClustererBuilder::<String>::new()
///     .grid_size(40)
///     .minimum_cluster_size(3)
///     .is_clusterable(|m: &Marker<String>| m.data().as_str() != "hidden")
///     .icon_renderer(|members: &[&Marker<String>]| {
///         IconContent::Text(format!("{} places", members.len()))
///     })
///     .build(viewport)?;
///
/// clusterer.handle_event(SurfaceEvent::Mounted);
/// clusterer.add_marker(Marker::new(LatLng::new(48.85, 2.35), "louvre".to_string()), false);
/// assert_eq!(clusterer.total_clusters(), 1);
/// # Ok::<(), markercluster::ClusterError>(())
/// ```
pub struct ClustererBuilder<T = ()> {
    config: ClustererConfig,
    is_clusterable: Option<ClusterablePredicate<T>>,
    renderer: Option<Box<dyn IconRenderer<T>>>,
}

impl<T> ClustererBuilder<T> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: ClustererConfig::default(),
            is_clusterable: None,
            renderer: None,
        }
    }

    /// Replace the whole configuration (e.g. one loaded from JSON).
    pub fn config(mut self, config: ClustererConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.config.grid_size = grid_size;
        self
    }

    pub fn max_zoom(mut self, max_zoom: f64) -> Self {
        self.config.max_zoom = Some(max_zoom);
        self
    }

    pub fn zoom_on_click(mut self, enabled: bool) -> Self {
        self.config.zoom_on_click = enabled;
        self
    }

    pub fn average_center(mut self, enabled: bool) -> Self {
        self.config.average_center = enabled;
        self
    }

    pub fn minimum_cluster_size(mut self, size: usize) -> Self {
        self.config.minimum_cluster_size = size;
        self
    }

    pub fn icon_style(mut self, icon: IconStyle) -> Self {
        self.config.icon = icon;
        self
    }

    /// Only markers accepted by `predicate` take part in clustering.
    pub fn is_clusterable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Marker<T>) -> bool + 'static,
    {
        self.is_clusterable = Some(Box::new(predicate));
        self
    }

    /// Produce cluster icon content with `renderer` instead of the member count.
    pub fn icon_renderer<R>(mut self, renderer: R) -> Self
    where
        R: IconRenderer<T> + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Validate the configuration and build the engine on `surface`.
    pub fn build<S: MapSurface>(self, surface: S) -> Result<MarkerClusterer<S, T>> {
        self.config.validate()?;
        let renderer = self.renderer.unwrap_or_else(|| Box::new(CountRenderer));
        Ok(MarkerClusterer::from_parts(
            surface,
            self.config,
            self.is_clusterable,
            renderer,
        ))
    }
}

impl<T> Default for ClustererBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ClustererBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClustererBuilder")
            .field("config", &self.config)
            .field("is_clusterable", &self.is_clusterable.is_some())
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
