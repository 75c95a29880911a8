use markercluster::prelude::*;
use markercluster::{Anchor, IconStyle, Projection, WebMercator};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn city_viewport() -> Viewport {
    // Manhattan at street level
    Viewport::new(LatLng::new(40.7580, -73.9855), 14.0, 1024, 768)
}

#[test]
fn test_lifecycle_through_events() {
    init_logging();
    let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(city_viewport());

    let ids = clusterer.add_markers(
        vec![
            Marker::at(LatLng::new(40.7580, -73.9855)),
            Marker::at(LatLng::new(40.7582, -73.9850)),
            Marker::at(LatLng::new(40.7484, -73.9857)),
        ],
        false,
    );
    assert_eq!(clusterer.total_clusters(), 0);

    clusterer.handle_event(SurfaceEvent::Mounted);
    assert_eq!(clusterer.total_clusters(), 2);
    let times_square = clusterer
        .get_marker_cluster(ids[0])
        .expect("Times Square cluster");
    assert!(times_square.contains_marker(ids[1]));
    assert!(!times_square.contains_marker(ids[2]));

    // Zooming out merges everything into one catchment.
    clusterer.surface_mut().set_zoom(11.0);
    clusterer.handle_event(SurfaceEvent::ZoomChanged);
    assert_eq!(clusterer.total_clusters(), 1);
    assert_eq!(clusterer.clusters()[0].len(), 3);

    clusterer.on_detach();
    assert_eq!(clusterer.total_clusters(), 0);
    assert!(clusterer.markers().all(|(_, m)| !m.is_attached()));

    // Detached engines do not cluster until mounted again.
    clusterer.redraw();
    assert_eq!(clusterer.total_clusters(), 0);
    clusterer.on_attach();
    assert_eq!(clusterer.total_clusters(), 1);
}

#[test]
fn test_viewport_idle_is_incremental() {
    init_logging();
    let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(city_viewport());
    clusterer.handle_event(SurfaceEvent::Mounted);

    // Empire State Building is off-screen from this view at zoom 16.
    clusterer.surface_mut().set_zoom(16.0);
    clusterer.handle_event(SurfaceEvent::ZoomChanged);
    let near = clusterer.add_marker(Marker::at(LatLng::new(40.7580, -73.9855)), false);
    let far = clusterer.add_marker(Marker::at(LatLng::new(40.7484, -73.9857)), false);
    assert!(clusterer.marker(near).unwrap().is_clustered());
    assert!(!clusterer.marker(far).unwrap().is_clustered());
    let first = clusterer.clusters()[0].id();

    clusterer
        .surface_mut()
        .set_center(LatLng::new(40.7530, -73.9856));
    clusterer.surface_mut().set_zoom(14.0);
    clusterer.handle_event(SurfaceEvent::ViewportIdle);

    assert!(clusterer.marker(far).unwrap().is_clustered());
    assert_eq!(clusterer.clusters()[0].id(), first);
    assert_eq!(clusterer.total_clusters(), 2);
}

#[test]
fn test_drag_end_reclusters_draggable_markers() {
    init_logging();
    let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(city_viewport());
    clusterer.handle_event(SurfaceEvent::Mounted);

    let anchor = clusterer.add_marker(Marker::at(LatLng::new(40.7580, -73.9855)), false);
    let dragged = clusterer.add_marker(
        Marker::at(LatLng::new(40.7480, -73.9855)).with_draggable(true),
        false,
    );
    let pinned = clusterer.add_marker(Marker::at(LatLng::new(40.7480, -73.9700)), false);
    assert_eq!(clusterer.total_clusters(), 3);

    let drop_at = LatLng::new(40.7581, -73.9856);
    clusterer.handle_event(SurfaceEvent::MarkerDragEnd {
        marker: dragged,
        position: drop_at,
    });
    assert_eq!(clusterer.marker(dragged).unwrap().position(), drop_at);
    assert_eq!(clusterer.total_clusters(), 2);
    assert!(clusterer.get_marker_cluster(anchor).unwrap().contains_marker(dragged));

    // Non-draggable markers ignore drag events.
    clusterer.handle_event(SurfaceEvent::MarkerDragEnd {
        marker: pinned,
        position: drop_at,
    });
    assert_eq!(
        clusterer.marker(pinned).unwrap().position(),
        LatLng::new(40.7480, -73.9700)
    );
}

#[test]
fn test_cluster_click_fits_member_bounds() {
    init_logging();
    let viewport = Viewport::new(LatLng::new(40.75, -73.98), 10.0, 1024, 768);
    let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(viewport);
    clusterer.handle_event(SurfaceEvent::Mounted);
    let ids = clusterer.add_markers(
        vec![
            Marker::at(LatLng::new(40.7580, -73.9855)),
            Marker::at(LatLng::new(40.7484, -73.9857)),
            Marker::at(LatLng::new(40.7527, -73.9772)),
        ],
        false,
    );
    assert_eq!(clusterer.total_clusters(), 1);
    let cluster_id = clusterer.clusters()[0].id();

    let members = clusterer.click_cluster(cluster_id).expect("cluster exists");
    assert_eq!(members.len(), 3);
    assert!(clusterer.surface().zoom() > 10.0);
    let visible = clusterer.surface().visible_bounds().unwrap();
    for id in &ids {
        assert!(visible.contains(&clusterer.marker(*id).unwrap().position()));
    }

    // The click already re-clustered for the new zoom.
    assert!(clusterer.total_clusters() > 1);
}

#[test]
fn test_cluster_click_without_zoom() {
    init_logging();
    let mut clusterer: MarkerClusterer<Viewport> = ClustererBuilder::new()
        .zoom_on_click(false)
        .build(city_viewport())
        .unwrap();
    clusterer.handle_event(SurfaceEvent::Mounted);
    clusterer.add_marker(Marker::at(LatLng::new(40.7580, -73.9855)), false);
    let id = clusterer.clusters()[0].id();

    clusterer.handle_event(SurfaceEvent::ClusterClicked(id));
    assert_eq!(clusterer.surface().zoom(), 14.0);
    assert!(clusterer.click_cluster(id).is_some());
}

#[test]
fn test_remove_markers_batch_and_clear() {
    init_logging();
    let mut clusterer: MarkerClusterer<Viewport> = MarkerClusterer::new(city_viewport());
    clusterer.handle_event(SurfaceEvent::Mounted);
    let ids = clusterer.add_markers(
        (0..20).map(|i| Marker::at(LatLng::new(40.75 + i as f64 * 0.0005, -73.98))),
        false,
    );
    assert_eq!(clusterer.stats().indexed, 20);

    assert!(clusterer.remove_markers(&ids[..5]));
    assert!(!clusterer.remove_markers(&ids[..5]));
    assert_eq!(clusterer.total_markers(), 15);
    assert_eq!(clusterer.stats().clustered_markers, 15);
    for id in &ids[..5] {
        assert!(clusterer.get_marker_cluster(*id).is_none());
    }

    let taken = clusterer.take_marker(ids[10]).expect("tracked marker");
    assert!(!taken.is_clustered());
    assert!(!taken.is_attached());

    clusterer.clear_markers();
    assert_eq!(clusterer.stats(), Default::default());
}

#[test]
fn test_config_json_to_engine() {
    init_logging();
    let json = r#"{
        "grid_size": 40,
        "minimum_cluster_size": 3,
        "icon": {"width": 30, "height": 40, "anchor": {"horizontal": "center", "vertical": "bottom"}}
    }"#;
    let config = ClustererConfig::from_json(json).expect("valid config");
    let mut clusterer: MarkerClusterer<Viewport> = ClustererBuilder::new()
        .config(config)
        .build(city_viewport())
        .unwrap();
    clusterer.handle_event(SurfaceEvent::Mounted);
    clusterer.add_markers(
        vec![
            Marker::at(LatLng::new(40.7580, -73.9855)),
            Marker::at(LatLng::new(40.7581, -73.9855)),
            Marker::at(LatLng::new(40.7580, -73.9856)),
        ],
        false,
    );

    let icon = clusterer.clusters()[0].icon();
    assert!(icon.is_visible());
    assert_eq!(
        *icon.style(),
        IconStyle {
            width: 30,
            height: 40,
            anchor: Anchor::BOTTOM_CENTER
        }
    );
    assert_eq!(icon.content(), Some(&IconContent::Count(3)));
    let origin = icon.origin().unwrap();
    let projection = WebMercator::new(14.0);
    let center = projection.to_pixel(icon.position().unwrap());
    assert!((center.x - origin.x - 15.0).abs() < 1e-6);
    assert!((center.y - origin.y - 40.0).abs() < 1e-6);
}

#[cfg(feature = "geojson")]
#[test]
fn test_geojson_markers_cluster() {
    init_logging();
    let json = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-73.9855, 40.7580]}, "properties": {"name": "Times Square"}},
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-73.9851, 40.7583]}, "properties": {"name": "Duffy Square"}},
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-73.9654, 40.7829]}, "properties": {"name": "Central Park"}}
      ]
    }"#;
    let markers = markercluster::markers_from_geojson(json).expect("valid GeoJSON");
    let mut clusterer = ClustererBuilder::new()
        .icon_renderer(|members: &[&Marker<geojson::JsonObject>]| {
            let mut names: Vec<&str> = members
                .iter()
                .filter_map(|m| m.data().get("name").and_then(|v| v.as_str()))
                .collect();
            names.sort();
            IconContent::Text(names.join(" / "))
        })
        .build(city_viewport())
        .unwrap();
    clusterer.handle_event(SurfaceEvent::Mounted);
    clusterer.add_markers(markers, false);

    let labels: Vec<String> = clusterer
        .clusters()
        .iter()
        .filter(|c| c.icon().is_visible())
        .filter_map(|c| c.icon().content().map(|content| content.to_string()))
        .collect();
    assert_eq!(labels, vec!["Duffy Square / Times Square".to_string()]);
}
