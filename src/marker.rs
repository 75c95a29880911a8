//! Markers and the order-preserving store the engine keeps them in.

use markercluster_types::point::LatLng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a registered marker.
///
/// Handed out by the engine when a marker is added and never reused for the
/// lifetime of that engine. Cluster membership is by `MarkerId`, not position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(u64);

impl MarkerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// A point marker with caller payload `T`.
///
/// The position is fixed at construction; the engine only flips the
/// presentation flags. Use [`MarkerClusterer::move_marker`](crate::MarkerClusterer::move_marker)
/// to relocate a registered marker so the spatial index stays in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<T = ()> {
    position: LatLng,
    visible: bool,
    clustered: bool,
    attached: bool,
    draggable: bool,
    data: T,
}

impl Marker<()> {
    /// A marker without payload.
    pub fn at(position: LatLng) -> Self {
        Self::new(position, ())
    }
}

impl<T> Marker<T> {
    pub fn new(position: LatLng, data: T) -> Self {
        Self {
            position,
            visible: false,
            clustered: false,
            attached: false,
            draggable: false,
            data,
        }
    }

    /// Mark the marker as draggable; drag-end events re-cluster it.
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Rendered standalone on the map (not folded into a cluster icon).
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Claimed by an active cluster.
    pub fn is_clustered(&self) -> bool {
        self.clustered
    }

    /// Currently mounted on the map surface.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.attached = true;
        }
    }

    pub(crate) fn set_clustered(&mut self, clustered: bool) {
        self.clustered = clustered;
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
        self.visible = false;
    }

    pub(crate) fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }
}

/// Registered markers keyed by id, iterated in registration order.
#[derive(Debug)]
pub struct MarkerStore<T> {
    markers: FxHashMap<MarkerId, Marker<T>>,
    /// Registration order. Removed ids linger here until the next compaction.
    order: Vec<MarkerId>,
    stale: usize,
    next_id: u64,
}

impl<T> MarkerStore<T> {
    pub fn new() -> Self {
        Self {
            markers: FxHashMap::default(),
            order: Vec::new(),
            stale: 0,
            next_id: 0,
        }
    }

    /// Register a marker, clearing its `clustered` flag.
    pub fn insert(&mut self, mut marker: Marker<T>) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        marker.set_clustered(false);
        self.markers.insert(id, marker);
        self.order.push(id);
        id
    }

    /// Unregister a marker in amortized constant time.
    pub fn remove(&mut self, id: MarkerId) -> Option<Marker<T>> {
        let marker = self.markers.remove(&id)?;
        self.stale += 1;
        if self.stale > self.markers.len() {
            self.compact();
        }
        Some(marker)
    }

    fn compact(&mut self) {
        let markers = &self.markers;
        self.order.retain(|id| markers.contains_key(id));
        self.stale = 0;
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker<T>> {
        self.markers.get(&id)
    }

    pub fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker<T>> {
        self.markers.get_mut(&id)
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.markers.contains_key(id))
    }

    /// Markers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker<T>)> {
        self.order
            .iter()
            .filter_map(|id| self.markers.get(id).map(|m| (*id, m)))
    }

    /// Release every marker from its cluster, optionally unmounting it too.
    pub fn reset(&mut self, detach: bool) {
        for marker in self.markers.values_mut() {
            marker.set_clustered(false);
            if detach {
                marker.detach();
            }
        }
    }

    /// Drop every marker, returning them in registration order.
    pub fn drain(&mut self) -> Vec<(MarkerId, Marker<T>)> {
        let order = std::mem::take(&mut self.order);
        self.stale = 0;
        order
            .into_iter()
            .filter_map(|id| self.markers.remove(&id).map(|m| (id, m)))
            .collect()
    }
}

impl<T> Default for MarkerStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
