//! A single cluster: its members, center and catchment rectangle.

use crate::bounds::{Projection, expand_point};
use crate::config::{ClustererConfig, IconStyle};
use crate::icon::{ClusterIcon, IconRenderer};
use crate::marker::{Marker, MarkerId, MarkerStore};
use geo::{BoundingRect, MultiPoint};
use markercluster_types::bounds::GeoBounds;
use markercluster_types::point::LatLng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Opaque handle of a cluster, unique within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(u64);

impl ClusterId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster#{}", self.0)
    }
}

/// Engine settings a cluster was formed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClusterSettings {
    pub grid_size: f64,
    pub average_center: bool,
    pub minimum_cluster_size: usize,
    pub max_zoom: Option<f64>,
    pub icon: IconStyle,
}

impl ClusterSettings {
    /// True when `zoom` is past the configured cap and clustering is off.
    pub fn exceeds_max_zoom(&self, zoom: f64) -> bool {
        self.max_zoom.is_some_and(|max| zoom > max)
    }
}

impl From<&ClustererConfig> for ClusterSettings {
    fn from(config: &ClustererConfig) -> Self {
        Self {
            grid_size: f64::from(config.grid_size),
            average_center: config.average_center,
            minimum_cluster_size: config.minimum_cluster_size,
            max_zoom: config.max_zoom,
            icon: config.icon,
        }
    }
}

/// A group of markers sharing one catchment rectangle.
///
/// Members keep insertion order and are unique by [`MarkerId`]. The center is
/// the first member's position, or the running mean of all members in
/// average-center mode; the catchment is recomputed every time it moves.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: ClusterId,
    members: SmallVec<[MarkerId; 8]>,
    center: Option<LatLng>,
    catchment: Option<GeoBounds>,
    settings: ClusterSettings,
    icon: ClusterIcon,
}

impl Cluster {
    pub(crate) fn new(id: ClusterId, settings: ClusterSettings) -> Self {
        Self {
            id,
            members: SmallVec::new(),
            center: None,
            catchment: None,
            icon: ClusterIcon::new(settings.icon),
            settings,
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn members(&self) -> &[MarkerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    /// Center grown by the grid size at the zoom of the last center update.
    pub fn catchment_bounds(&self) -> Option<GeoBounds> {
        self.catchment
    }

    pub fn icon(&self) -> &ClusterIcon {
        &self.icon
    }

    pub fn contains_marker(&self, marker: MarkerId) -> bool {
        self.members.contains(&marker)
    }

    /// Whether `position` falls inside the catchment rectangle.
    pub fn contains_point(&self, position: &LatLng) -> bool {
        self.catchment
            .is_some_and(|bounds| bounds.contains(position))
    }

    /// Tight bounds around the members' positions.
    pub fn member_bounds<T>(&self, markers: &MarkerStore<T>) -> Option<GeoBounds> {
        let points: MultiPoint<f64> = self
            .members
            .iter()
            .filter_map(|id| markers.get(*id).map(|m| *m.position().as_point()))
            .collect();
        points.bounding_rect().map(GeoBounds::from_rect)
    }

    /// Add a marker, returning `false` if it is already a member or unknown.
    ///
    /// Below the minimum size each new member is shown on its own; the add that
    /// reaches the minimum hides every member, and later adds hide just the
    /// newcomer.
    pub fn add<T, P>(&mut self, marker: MarkerId, markers: &mut MarkerStore<T>, projection: &P) -> bool
    where
        P: Projection + ?Sized,
    {
        if self.contains_marker(marker) {
            return false;
        }
        let Some(position) = markers.get(marker).map(Marker::position) else {
            return false;
        };

        let count = self.members.len() + 1;
        match self.center {
            None => {
                self.center = Some(position);
                self.update_catchment(projection);
            }
            Some(center) if self.settings.average_center => {
                let n = count as f64;
                self.center = Some(LatLng::new(
                    (center.lat() * (n - 1.0) + position.lat()) / n,
                    (center.lng() * (n - 1.0) + position.lng()) / n,
                ));
                self.update_catchment(projection);
            }
            Some(_) => {}
        }

        self.members.push(marker);
        if let Some(m) = markers.get_mut(marker) {
            m.set_clustered(true);
        }

        let minimum = self.settings.minimum_cluster_size;
        if count < minimum {
            if let Some(m) = markers.get_mut(marker) {
                m.set_visible(true);
            }
        } else if count == minimum {
            for id in &self.members {
                if let Some(m) = markers.get_mut(*id) {
                    m.set_visible(false);
                }
            }
        } else if let Some(m) = markers.get_mut(marker) {
            m.set_visible(false);
        }

        true
    }

    /// Remove a member, returning whether it was present.
    ///
    /// Center and catchment stay as they were. If the cluster drops below the
    /// minimum size its remaining members are shown standalone again and the
    /// icon is hidden.
    pub fn remove<T>(&mut self, marker: MarkerId, markers: &mut MarkerStore<T>) -> bool {
        let Some(index) = self.members.iter().position(|m| *m == marker) else {
            return false;
        };
        self.members.remove(index);
        if let Some(m) = markers.get_mut(marker) {
            m.set_clustered(false);
        }

        if self.members.len() < self.settings.minimum_cluster_size {
            for id in &self.members {
                if let Some(m) = markers.get_mut(*id) {
                    m.set_visible(true);
                }
            }
            self.icon.hide();
        }
        true
    }

    /// Bring the icon and member visibility in line with the current zoom.
    ///
    /// Past the max zoom clustering is off: every member is shown and the icon
    /// hidden. Otherwise the icon is shown at the center once the cluster has
    /// reached the minimum size.
    pub fn refresh_presentation<T, P>(
        &mut self,
        markers: &mut MarkerStore<T>,
        zoom: f64,
        projection: &P,
        renderer: &dyn IconRenderer<T>,
    ) where
        P: Projection + ?Sized,
    {
        if self.settings.exceeds_max_zoom(zoom) {
            for id in &self.members {
                if let Some(m) = markers.get_mut(*id) {
                    m.set_visible(true);
                }
            }
            self.icon.hide();
            return;
        }

        if self.members.len() < self.settings.minimum_cluster_size {
            self.icon.hide();
            return;
        }

        let Some(center) = self.center else {
            self.icon.hide();
            return;
        };

        let content = {
            let members: Vec<&Marker<T>> =
                self.members.iter().filter_map(|id| markers.get(*id)).collect();
            renderer.render(&members)
        };
        self.icon.show(center, projection.to_pixel(center), content);
    }

    /// Release the icon and forget all members.
    pub fn dispose(&mut self) {
        self.icon.release();
        self.members.clear();
    }

    fn update_catchment<P>(&mut self, projection: &P)
    where
        P: Projection + ?Sized,
    {
        self.catchment = self
            .center
            .map(|center| expand_point(center, self.settings.grid_size, projection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{CountRenderer, IconContent};
    use crate::projection::WebMercator;

    fn settings(minimum_cluster_size: usize, average_center: bool) -> ClusterSettings {
        let config = ClustererConfig::default()
            .with_minimum_cluster_size(minimum_cluster_size)
            .with_average_center(average_center);
        ClusterSettings::from(&config)
    }

    fn store_with(positions: &[(f64, f64)]) -> (MarkerStore<()>, Vec<MarkerId>) {
        let mut store = MarkerStore::new();
        let ids = positions
            .iter()
            .map(|(lat, lng)| store.insert(Marker::at(LatLng::new(*lat, *lng))))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_first_add_sets_center_and_catchment() {
        let (mut store, ids) = store_with(&[(10.0, 20.0)]);
        let projection = WebMercator::new(8.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));

        assert!(cluster.add(ids[0], &mut store, &projection));
        assert_eq!(cluster.center(), Some(LatLng::new(10.0, 20.0)));
        let catchment = cluster.catchment_bounds().unwrap();
        assert!(catchment.contains(&LatLng::new(10.0, 20.0)));
        assert!(catchment.max_lng() > 20.0 && catchment.min_lng() < 20.0);
        assert!(store.get(ids[0]).unwrap().is_clustered());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let (mut store, ids) = store_with(&[(0.0, 0.0)]);
        let projection = WebMercator::new(3.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));

        assert!(cluster.add(ids[0], &mut store, &projection));
        assert!(!cluster.add(ids[0], &mut store, &projection));
        assert_eq!(cluster.len(), 1);
    }

    #[test]
    fn test_unknown_marker_rejected() {
        let (mut store, ids) = store_with(&[(0.0, 0.0)]);
        store.remove(ids[0]);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));
        assert!(!cluster.add(ids[0], &mut store, &WebMercator::new(3.0)));
        assert!(cluster.is_empty());
    }

    #[test]
    fn test_fixed_center_without_average_mode() {
        let (mut store, ids) = store_with(&[(0.0, 0.0), (0.0, 2.0)]);
        let projection = WebMercator::new(1.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));
        cluster.add(ids[0], &mut store, &projection);
        let catchment = cluster.catchment_bounds();
        cluster.add(ids[1], &mut store, &projection);
        assert_eq!(cluster.center(), Some(LatLng::new(0.0, 0.0)));
        assert_eq!(cluster.catchment_bounds(), catchment);
    }

    #[test]
    fn test_average_center_sequence() {
        let (mut store, ids) = store_with(&[(0.0, 0.0), (0.0, 2.0), (0.0, 4.0)]);
        let projection = WebMercator::new(1.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, true));

        cluster.add(ids[0], &mut store, &projection);
        assert_eq!(cluster.center(), Some(LatLng::new(0.0, 0.0)));
        cluster.add(ids[1], &mut store, &projection);
        assert_eq!(cluster.center(), Some(LatLng::new(0.0, 1.0)));
        cluster.add(ids[2], &mut store, &projection);
        assert_eq!(cluster.center(), Some(LatLng::new(0.0, 2.0)));
        assert!(cluster.contains_point(&LatLng::new(0.0, 2.0)));
    }

    #[test]
    fn test_contains_point_stops_at_catchment_edge() {
        let (mut store, ids) = store_with(&[(0.0, 0.0)]);
        let projection = WebMercator::new(10.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));
        cluster.add(ids[0], &mut store, &projection);

        // 60 px at zoom 10 is 60 * 360 / 2^18 degrees of longitude.
        let edge = 60.0 * 360.0 / 262_144.0;
        assert!(cluster.contains_point(&LatLng::new(0.0, edge * 0.99)));
        assert!(cluster.contains_point(&LatLng::new(0.0, -edge * 0.99)));
        assert!(!cluster.contains_point(&LatLng::new(0.0, edge * 1.01)));
        assert!(!cluster.contains_point(&LatLng::new(edge * 1.01, 0.0)));
        assert!(!cluster.contains_point(&LatLng::new(0.0, -edge * 1.01)));
    }

    #[test]
    fn test_exceeds_max_zoom() {
        let uncapped = settings(2, false);
        assert!(!uncapped.exceeds_max_zoom(22.0));

        let config = ClustererConfig::default().with_max_zoom(Some(10.0));
        let capped = ClusterSettings::from(&config);
        assert!(!capped.exceeds_max_zoom(10.0));
        assert!(capped.exceeds_max_zoom(10.5));
    }

    #[test]
    fn test_minimum_size_visibility_threshold() {
        let (mut store, ids) = store_with(&[(0.0, 0.0), (0.0, 0.001), (0.0, 0.002), (0.0, 0.003)]);
        let projection = WebMercator::new(10.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(3, false));

        cluster.add(ids[0], &mut store, &projection);
        cluster.add(ids[1], &mut store, &projection);
        assert!(store.get(ids[0]).unwrap().is_visible());
        assert!(store.get(ids[1]).unwrap().is_visible());

        cluster.add(ids[2], &mut store, &projection);
        for id in &ids[..3] {
            assert!(!store.get(*id).unwrap().is_visible());
        }

        cluster.add(ids[3], &mut store, &projection);
        assert!(!store.get(ids[3]).unwrap().is_visible());

        cluster.refresh_presentation(&mut store, 10.0, &projection, &CountRenderer);
        assert!(cluster.icon().is_visible());
        assert_eq!(cluster.icon().content(), Some(&IconContent::Count(4)));
        assert_eq!(cluster.icon().position(), cluster.center());
    }

    #[test]
    fn test_icon_hidden_below_minimum() {
        let (mut store, ids) = store_with(&[(0.0, 0.0)]);
        let projection = WebMercator::new(10.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(2, false));
        cluster.add(ids[0], &mut store, &projection);
        cluster.refresh_presentation(&mut store, 10.0, &projection, &CountRenderer);
        assert!(!cluster.icon().is_visible());
        assert!(store.get(ids[0]).unwrap().is_visible());
    }

    #[test]
    fn test_max_zoom_forces_members_visible() {
        let (mut store, ids) = store_with(&[(0.0, 0.0), (0.0, 0.0001)]);
        let projection = WebMercator::new(16.0);
        let config = ClustererConfig::default()
            .with_minimum_cluster_size(2)
            .with_max_zoom(Some(15.0));
        let mut cluster = Cluster::new(ClusterId::new(0), ClusterSettings::from(&config));

        cluster.add(ids[0], &mut store, &projection);
        cluster.add(ids[1], &mut store, &projection);
        assert!(!store.get(ids[0]).unwrap().is_visible());

        cluster.refresh_presentation(&mut store, 16.0, &projection, &CountRenderer);
        assert!(!cluster.icon().is_visible());
        assert!(store.get(ids[0]).unwrap().is_visible());
        assert!(store.get(ids[1]).unwrap().is_visible());
    }

    #[test]
    fn test_remove_below_minimum_reshows_members() {
        let (mut store, ids) = store_with(&[(0.0, 0.0), (0.0, 0.001), (0.0, 0.002)]);
        let projection = WebMercator::new(10.0);
        let mut cluster = Cluster::new(ClusterId::new(0), settings(3, false));
        for id in &ids {
            cluster.add(*id, &mut store, &projection);
        }
        cluster.refresh_presentation(&mut store, 10.0, &projection, &CountRenderer);
        assert!(cluster.icon().is_visible());

        assert!(cluster.remove(ids[2], &mut store));
        assert!(!cluster.remove(ids[2], &mut store));
        assert!(!store.get(ids[2]).unwrap().is_clustered());
        assert!(store.get(ids[0]).unwrap().is_visible());
        assert!(store.get(ids[1]).unwrap().is_visible());
        assert!(!cluster.icon().is_visible());
        assert_eq!(cluster.center(), Some(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_member_bounds_and_dispose() {
        let (mut store, ids) = store_with(&[(1.0, 1.0), (2.0, 3.0)]);
        let projection = WebMercator::new(1.0);
        let mut cluster = Cluster::new(ClusterId::new(7), settings(2, false));
        cluster.add(ids[0], &mut store, &projection);
        cluster.add(ids[1], &mut store, &projection);
        assert_eq!(
            cluster.member_bounds(&store),
            Some(GeoBounds::new(1.0, 1.0, 2.0, 3.0))
        );

        cluster.dispose();
        assert!(cluster.is_empty());
        assert!(cluster.icon().is_released());
        assert_eq!(cluster.member_bounds(&store), None);
        assert_eq!(cluster.id().to_string(), "cluster#7");
    }
}
