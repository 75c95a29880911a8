//! The clustering engine.
//!
//! [`MarkerClusterer`] owns the registered markers, an R-tree over their
//! positions and the list of active clusters, and re-clusters against the
//! host surface's viewport. Everything runs synchronously on the caller's
//! thread: each operation or event completes its pass before returning.
//!
//! ## Pass
//!
//! 1. Skip unless the surface has been mounted and is laid out.
//! 2. Grow the visible region by `grid_size` pixels.
//! 3. Walk unclustered, eligible markers inside that region in registration
//!    order. Each one seeds a new cluster, which then takes every unclustered,
//!    eligible marker the index finds inside the seed's own catchment.
//!
//! Seeds win greedily: there is no distance tie-breaking and clusters never
//! merge or split within a pass.

use crate::bounds;
use crate::cluster::{Cluster, ClusterId, ClusterSettings};
use crate::config::ClustererConfig;
use crate::error::Result;
use crate::icon::{CountRenderer, IconRenderer};
use crate::marker::{Marker, MarkerId, MarkerStore};
use crate::spatial_index::{IndexRecord, MarkerIndex};
use crate::surface::{MapSurface, SurfaceEvent};
use markercluster_types::point::LatLng;

/// Decides whether a marker takes part in clustering at all.
pub type ClusterablePredicate<T> = Box<dyn Fn(&Marker<T>) -> bool>;

/// Lifecycle callbacks a host map binding drives on an overlay.
pub trait OverlayLifecycle {
    /// The overlay was mounted on the map surface.
    fn on_attach(&mut self);

    /// The overlay was taken off the map surface.
    fn on_detach(&mut self);

    /// The host asks the overlay to draw itself.
    fn on_redraw(&mut self);
}

/// Point-in-time counters for an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClustererStats {
    /// Registered markers
    pub markers: usize,
    /// Records in the spatial index
    pub indexed: usize,
    /// Active clusters
    pub clusters: usize,
    /// Markers claimed by an active cluster
    pub clustered_markers: usize,
    /// Markers rendered standalone
    pub visible_markers: usize,
}

/// Groups markers on a [`MapSurface`] into viewport-dependent clusters.
pub struct MarkerClusterer<S, T = ()> {
    surface: S,
    config: ClustererConfig,
    markers: MarkerStore<T>,
    index: MarkerIndex,
    clusters: Vec<Cluster>,
    next_cluster_id: u64,
    ready: bool,
    attached: bool,
    is_clusterable: Option<ClusterablePredicate<T>>,
    renderer: Box<dyn IconRenderer<T>>,
}

impl<S: MapSurface, T> MarkerClusterer<S, T> {
    /// Create an engine with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::from_parts(surface, ClustererConfig::default(), None, Box::new(CountRenderer))
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(surface: S, config: ClustererConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(surface, config, None, Box::new(CountRenderer)))
    }

    pub(crate) fn from_parts(
        surface: S,
        config: ClustererConfig,
        is_clusterable: Option<ClusterablePredicate<T>>,
        renderer: Box<dyn IconRenderer<T>>,
    ) -> Self {
        Self {
            surface,
            config,
            markers: MarkerStore::new(),
            index: MarkerIndex::new(),
            clusters: Vec::new(),
            next_cluster_id: 0,
            ready: false,
            attached: false,
            is_clusterable,
            renderer,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface. Deliver the matching [`SurfaceEvent`]
    /// after changing the view so the clusters follow.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &ClustererConfig {
        &self.config
    }

    /// Whether the surface has signalled it is mounted at least once.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker<T>> {
        self.markers.get(id)
    }

    /// Registered markers in registration order.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker<T>)> {
        self.markers.iter()
    }

    /// Active clusters in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn total_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn total_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn stats(&self) -> ClustererStats {
        let mut stats = ClustererStats {
            markers: self.markers.len(),
            indexed: self.index.len(),
            clusters: self.clusters.len(),
            ..Default::default()
        };
        for (_, marker) in self.markers.iter() {
            if marker.is_clustered() {
                stats.clustered_markers += 1;
            }
            if marker.is_visible() {
                stats.visible_markers += 1;
            }
        }
        stats
    }

    /// Register a marker and, unless `defer_redraw`, run an incremental pass.
    pub fn add_marker(&mut self, marker: Marker<T>, defer_redraw: bool) -> MarkerId {
        let position = marker.position();
        let id = self.markers.insert(marker);
        self.index.insert(IndexRecord::from_position(position, id));
        if !defer_redraw {
            self.redraw();
        }
        id
    }

    /// Register many markers with a single bulk index load.
    pub fn add_markers<I>(&mut self, markers: I, defer_redraw: bool) -> Vec<MarkerId>
    where
        I: IntoIterator<Item = Marker<T>>,
    {
        let mut records = Vec::new();
        let ids: Vec<MarkerId> = markers
            .into_iter()
            .map(|marker| {
                let position = marker.position();
                let id = self.markers.insert(marker);
                records.push(IndexRecord::from_position(position, id));
                id
            })
            .collect();

        log::debug!("Registering {} markers", ids.len());
        self.index.load(records);
        if !defer_redraw {
            self.redraw();
        }
        ids
    }

    /// Unregister a marker and hand it back, re-clustering from scratch.
    pub fn take_marker(&mut self, id: MarkerId) -> Option<Marker<T>> {
        let marker = self.detach_marker(id)?;
        self.reset_viewport(false);
        self.redraw();
        Some(marker)
    }

    /// Unregister a marker. Returns `false` if it was not registered.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.take_marker(id).is_some()
    }

    /// Unregister several markers; re-clusters once if any were removed.
    pub fn remove_markers(&mut self, ids: &[MarkerId]) -> bool {
        let mut removed = false;
        for id in ids {
            removed |= self.detach_marker(*id).is_some();
        }
        if removed {
            self.reset_viewport(false);
            self.redraw();
        }
        removed
    }

    /// Drop every cluster and marker.
    pub fn clear_markers(&mut self) {
        self.reset_viewport(true);
        self.index.clear();
        let dropped = self.markers.drain();
        log::debug!("Cleared {} markers", dropped.len());
    }

    /// Relocate a registered marker and re-cluster.
    pub fn move_marker(&mut self, id: MarkerId, position: LatLng) -> bool {
        let Some(marker) = self.markers.get_mut(id) else {
            return false;
        };
        marker.set_position(position);
        self.index.remove_marker(id);
        self.index.insert(IndexRecord::from_position(position, id));
        self.repaint();
        true
    }

    /// Incremental pass: cluster markers that are not yet clustered.
    pub fn redraw(&mut self) {
        self.create_clusters();
    }

    /// Full recompute, needed whenever the zoom changes.
    pub fn repaint(&mut self) {
        self.reset_viewport(false);
        self.redraw();
    }

    /// Dispose every cluster and release all markers from them.
    pub fn reset_viewport(&mut self, detach_markers: bool) {
        for cluster in &mut self.clusters {
            cluster.dispose();
        }
        self.clusters.clear();
        self.markers.reset(detach_markers);
    }

    /// The active cluster containing `marker`.
    pub fn get_marker_cluster(&self, marker: MarkerId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains_marker(marker))
    }

    /// Dispose one cluster, releasing its members.
    pub fn remove_cluster(&mut self, id: ClusterId) -> bool {
        let Some(index) = self.clusters.iter().position(|c| c.id() == id) else {
            return false;
        };
        let mut cluster = self.clusters.remove(index);
        for member in cluster.members() {
            if let Some(marker) = self.markers.get_mut(*member) {
                marker.set_clustered(false);
            }
        }
        cluster.dispose();
        true
    }

    /// Handle a cluster icon click and return the members.
    ///
    /// With `zoom_on_click` the surface is fitted to the members' bounds and
    /// the clusters are rebuilt for the new view: a full repaint if the zoom
    /// changed, otherwise an incremental pass for the panned viewport.
    pub fn click_cluster(&mut self, id: ClusterId) -> Option<Vec<MarkerId>> {
        let cluster = self.clusters.iter().find(|c| c.id() == id)?;
        let members = cluster.members().to_vec();
        if !self.config.zoom_on_click {
            return Some(members);
        }
        let Some(bounds) = cluster.member_bounds(&self.markers) else {
            return Some(members);
        };

        let zoom = self.surface.zoom();
        self.surface.fit_bounds(&bounds);
        if self.surface.zoom() != zoom {
            log::debug!("Zoomed from {:.2} to {:.2} on {}", zoom, self.surface.zoom(), id);
            self.repaint();
        } else {
            self.redraw();
        }
        Some(members)
    }

    /// Dispatch one host notification.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        log::trace!("Handling surface event {:?}", event);
        match event {
            SurfaceEvent::Mounted => self.on_attach(),
            SurfaceEvent::ZoomChanged => self.repaint(),
            SurfaceEvent::ViewportIdle => self.redraw(),
            SurfaceEvent::MarkerDragEnd { marker, position } => {
                match self.markers.get(marker).map(Marker::is_draggable) {
                    Some(true) => {
                        self.move_marker(marker, position);
                    }
                    Some(false) => log::debug!("Ignoring drag end for non-draggable {}", marker),
                    None => log::debug!("Ignoring drag end for unknown {}", marker),
                }
            }
            SurfaceEvent::ClusterClicked(id) => {
                self.click_cluster(id);
            }
        }
    }

    pub fn set_grid_size(&mut self, grid_size: u32) -> Result<()> {
        self.update_config(|config| config.grid_size = grid_size)
    }

    pub fn set_max_zoom(&mut self, max_zoom: Option<f64>) -> Result<()> {
        self.update_config(|config| config.max_zoom = max_zoom)
    }

    pub fn set_minimum_cluster_size(&mut self, size: usize) -> Result<()> {
        self.update_config(|config| config.minimum_cluster_size = size)
    }

    pub fn set_average_center(&mut self, enabled: bool) {
        self.config.average_center = enabled;
        self.repaint();
    }

    pub fn set_zoom_on_click(&mut self, enabled: bool) {
        self.config.zoom_on_click = enabled;
    }

    fn update_config<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut ClustererConfig),
    {
        let mut config = self.config.clone();
        update(&mut config);
        config.validate()?;
        self.config = config;
        self.repaint();
        Ok(())
    }

    fn detach_marker(&mut self, id: MarkerId) -> Option<Marker<T>> {
        let mut marker = self.markers.remove(id)?;
        if !self.index.remove_marker(id) {
            log::warn!("{} was registered but missing from the spatial index", id);
        }
        marker.detach();
        marker.set_clustered(false);
        Some(marker)
    }

    fn create_clusters(&mut self) {
        if !(self.ready && self.attached) {
            log::debug!("Skipping clustering pass: surface not mounted");
            return;
        }
        let (Some(visible), Some(projection)) =
            (self.surface.visible_bounds(), self.surface.projection())
        else {
            log::debug!("Skipping clustering pass: viewport has no bounds yet");
            return;
        };

        let zoom = self.surface.zoom();
        let grid_size = f64::from(self.config.grid_size);
        let region = bounds::expand(&visible, grid_size, &projection);
        let settings = ClusterSettings::from(&self.config);
        let is_clusterable = &self.is_clusterable;
        let eligible = |marker: &Marker<T>| is_clusterable.as_ref().is_none_or(|f| f(marker));

        let seeds: Vec<MarkerId> = self.markers.ids().collect();
        let before = self.clusters.len();
        for seed in seeds {
            let Some(marker) = self.markers.get(seed) else {
                continue;
            };
            let position = marker.position();
            if marker.is_clustered() || !region.contains(&position) || !eligible(marker) {
                continue;
            }

            let mut cluster = Cluster::new(ClusterId::new(self.next_cluster_id), settings);
            self.next_cluster_id += 1;
            cluster.add(seed, &mut self.markers, &projection);

            let catchment = bounds::expand_point(position, grid_size, &projection);
            for record in self.index.search(&bounds::to_query_rect(&catchment)) {
                let Some(candidate) = self.markers.get(record.marker) else {
                    continue;
                };
                if candidate.is_clustered() || !eligible(candidate) {
                    continue;
                }
                cluster.add(record.marker, &mut self.markers, &projection);
            }
            self.clusters.push(cluster);
        }

        for cluster in &mut self.clusters {
            cluster.refresh_presentation(&mut self.markers, zoom, &projection, self.renderer.as_ref());
        }

        log::debug!(
            "Clustering pass at zoom {:.2} created {} clusters ({} active)",
            zoom,
            self.clusters.len() - before,
            self.clusters.len()
        );
    }
}

impl<S: MapSurface, T> OverlayLifecycle for MarkerClusterer<S, T> {
    fn on_attach(&mut self) {
        if !self.ready {
            log::debug!("Surface mounted; clusterer ready");
        }
        self.ready = true;
        self.attached = true;
        self.repaint();
    }

    fn on_detach(&mut self) {
        self.reset_viewport(true);
        self.attached = false;
    }

    fn on_redraw(&mut self) {
        self.redraw();
    }
}

impl<S, T> std::fmt::Debug for MarkerClusterer<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerClusterer")
            .field("config", &self.config)
            .field("markers", &self.markers.len())
            .field("indexed", &self.index.len())
            .field("clusters", &self.clusters.len())
            .field("ready", &self.ready)
            .field("attached", &self.attached)
            .finish()
    }
}
