//! Integration tests for the geo core
//!
//! These run against the public API only. Most use the small fixture table
//! from `sentinel_geo_data::fixtures`; the end-to-end workflow runs on the
//! embedded Baguio City table.

use std::{fs, sync::Arc};

use sentinel_geo::{
    AddressHint, ClusterPolicy, Coordinate, GeoConfigBuilder, GeoCore, InferenceSource, Linkage,
    MarkerKind, Priority, RegionTable, ReportFilter, distance_km,
    data::{FixtureConfig, RegionAsset, RegionRecord, create_fixture_asset},
    error::GeocodeError,
    store::{NewReport, NotificationKind, ReportEvent, SosStatus},
};

fn setup_test_env() {
    let _ = sentinel_geo::init_logging(tracing::Level::WARN);
}

fn fixture_core() -> GeoCore {
    setup_test_env();
    let table = RegionTable::from_asset(&create_fixture_asset(&FixtureConfig::sample()));
    GeoCore::builder().table(table).build().expect("fixture core should build")
}

/// Points spread over a few hundred metres around Session Road.
fn scatter() -> Vec<Coordinate> {
    let mut points = Vec::new();
    for i in 0..8 {
        for j in 0..5 {
            points.push(Coordinate::new(
                16.41 + f64::from(i) * 0.00023,
                120.60 + f64::from(j) * 0.00031,
            ));
        }
    }
    points
}

#[test]
fn test_full_workflow() {
    setup_test_env();
    let core = GeoCore::new_embedded().expect("Should create core from embedded table");

    // 1. Resolution
    let nearest = core
        .nearest_region(Coordinate::new(16.4125, 120.5964))
        .expect("Should resolve a point inside the city");
    assert_eq!(nearest.name(), "Session Road Area");
    assert!(core.nearest_region_strict(Coordinate::new(17.0, 121.5)).is_none());

    // 2. Search
    let suggestions = core.search("burnham");
    assert_eq!(suggestions[0].name, "Burnham Road");
    assert!(suggestions.len() <= core.config().suggestion_limit);

    // 3. Reports through the store onto the map
    let (reports, notifications) = core.new_stores();
    for (description, location, barangay) in [
        ("Flooding", Some(Coordinate::new(16.41, 120.60)), ""),
        ("Flooding again", Some(Coordinate::new(16.4101, 120.6001)), ""),
        ("Landslide", None, "Irisan"),
        ("Lost", None, "Nonexistent Place"),
    ] {
        let report = reports.submit(NewReport {
            reporter_id: "citizen-1".into(),
            description: description.into(),
            barangay: barangay.into(),
            priority: Some(Priority::High),
            location,
            ..NewReport::default()
        });
        reports.approve(&report.id).expect("Report was just submitted");
    }
    assert_eq!(notifications.snapshot().len(), 4);

    let approved = reports.approved();
    let placement = core.place_reports(&approved, None);
    assert_eq!(placement.clusters.len(), 1);
    assert_eq!(placement.region_groups.len(), 1);
    assert_eq!(placement.unplaced.len(), 1);
    assert_eq!(placement.placed_count(), 3);

    let markers = core.markers(&placement);
    let kinds: Vec<MarkerKind> = markers.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MarkerKind::Cluster, MarkerKind::RegionGroup]);
    assert!(placement.fit_bounds().contains(Coordinate::new(16.41, 120.60)));
}

#[test]
fn test_table_from_asset_file() {
    setup_test_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");

    let mut asset = create_fixture_asset(&FixtureConfig::minimal());
    asset.regions.push(RegionRecord::new("Scout Barrio", 16.3980, 120.6150));
    fs::write(&path, asset.to_json_string().unwrap()).unwrap();

    let table = RegionTable::from_asset(&RegionAsset::from_path(&path).unwrap());
    assert_eq!(table.len(), 4);
    let core = GeoCore::from_table(Arc::new(table));
    assert_eq!(
        core.centroid_of("scout barrio"),
        Some(Coordinate::new(16.3980, 120.6150))
    );
}

#[test]
fn test_clusters_partition_input() {
    let core = fixture_core();
    let points = scatter();
    for zoom in [10, 13, 15, 18] {
        let clusters = core.cluster(&points, zoom);
        let mut members: Vec<Coordinate> =
            clusters.iter().flat_map(|c| c.members.iter().copied()).collect();
        assert_eq!(members.len(), points.len());
        members.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lng.total_cmp(&b.lng)));
        let mut expected = points.clone();
        expected.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lng.total_cmp(&b.lng)));
        assert_eq!(members, expected);
    }
}

#[test]
fn test_default_radius_never_exceeded() {
    let core = fixture_core();
    let points = scatter();
    for zoom in [10, 13, 15, 18] {
        for cluster in core.cluster(&points, zoom) {
            for a in &cluster.members {
                for b in &cluster.members {
                    assert!(distance_km(*a, *b) <= 0.05, "zoom {zoom}: {a:?} and {b:?}");
                }
            }
        }
    }
}

#[test]
fn test_zoom_aware_complete_linkage() {
    setup_test_env();
    let config = GeoConfigBuilder::zoom_aware().build();
    let table = RegionTable::from_asset(&create_fixture_asset(&FixtureConfig::sample()));
    let core = GeoCore::builder().table(table).config(config).build().unwrap();
    let points = scatter();

    for zoom in [12, 14, 16] {
        let radius = core.config().cluster.effective_radius_km(zoom);
        for cluster in core.cluster(&points, zoom) {
            for a in &cluster.members {
                for b in &cluster.members {
                    assert!(distance_km(*a, *b) <= radius);
                }
            }
        }
    }
    // Lower zoom, larger radius, fewer clusters
    assert!(core.cluster(&points, 12).len() <= core.cluster(&points, 16).len());
}

#[test]
fn test_seed_linkage_can_chain() {
    setup_test_env();
    let policy = ClusterPolicy {
        linkage: Linkage::Seed,
        ..ClusterPolicy::default()
    };
    let config = GeoConfigBuilder::new().cluster_policy(policy).build();
    let table = RegionTable::from_asset(&create_fixture_asset(&FixtureConfig::minimal()));
    let core = GeoCore::builder().table(table).config(config).build().unwrap();

    // Both neighbours are ~44 m from the seed but ~89 m from each other
    let points = [
        Coordinate::new(16.41, 120.60),
        Coordinate::new(16.4104, 120.60),
        Coordinate::new(16.4096, 120.60),
    ];
    assert_eq!(core.cluster(&points, 13).len(), 1);
}

#[test]
fn test_priority_filter() {
    let core = fixture_core();
    let (reports, _) = core.new_stores();
    for priority in [Priority::High, Priority::Low] {
        let r = reports.submit(NewReport {
            reporter_id: "citizen-2".into(),
            description: format!("{priority} report"),
            priority: Some(priority),
            location: Some(Coordinate::new(16.3667, 120.6233)),
            ..NewReport::default()
        });
        reports.approve(&r.id);
    }
    let all = reports.snapshot();
    let filter = ReportFilter::with_priority(Priority::High);
    let placement = core.place_reports_with_filter(&all, &filter, None);
    assert_eq!(placement.placed_count(), 1);
    assert_eq!(
        placement.placed_reports().next().map(|r| r.priority),
        Some(Some(Priority::High))
    );
}

#[test]
fn test_address_inference() {
    let core = fixture_core();
    let point = Coordinate::new(16.4150, 120.5990);

    let geocoder = |_: Coordinate| -> Result<AddressHint, GeocodeError> {
        Ok(AddressHint {
            suburb: Some("Pacdal".into()),
            ..AddressHint::default()
        })
    };
    let inferred = core.infer_region(&geocoder, point).unwrap();
    assert_eq!(inferred.region.name(), "Pacdal");
    assert_eq!(inferred.source, InferenceSource::AddressTerm);

    let unreachable = |_: Coordinate| -> Result<AddressHint, GeocodeError> {
        Err(GeocodeError::Unreachable("connection refused".into()))
    };
    let inferred = core.infer_region(&unreachable, point).unwrap();
    assert_eq!(inferred.source, InferenceSource::Nearest);
}

#[tokio::test]
async fn test_subscribers_see_changes_in_order() {
    let core = fixture_core();
    let (reports, _) = core.new_stores();
    let mut events = reports.subscribe();

    let writer = reports.clone();
    let handle = tokio::spawn(async move {
        let r = writer.submit(NewReport {
            reporter_id: "citizen-3".into(),
            description: "Power outage".into(),
            barangay: "Kias".into(),
            ..NewReport::default()
        });
        writer.reject(&r.id);
        r.id
    });
    let id = handle.await.unwrap();

    match events.next().await {
        Some(ReportEvent::Submitted(r)) => assert_eq!(r.id, id),
        other => panic!("expected submission, got {other:?}"),
    }
    match events.next().await {
        Some(ReportEvent::Rejected(r)) => assert_eq!(r.id, id),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_sos_lifecycle() {
    let core = fixture_core();
    let (_, notifications) = core.new_stores();

    let alert = notifications.emergency_sos(
        "Juan",
        "juan@example.com",
        Some(Coordinate::new(16.4125, 120.5964)),
    );
    assert_eq!(alert.kind, NotificationKind::Sos);
    assert_eq!(notifications.sos_count(), 1);
    assert!(alert.message.contains("16.412500, 120.596400"));

    let responded = notifications
        .update_sos_status(&alert.id, SosStatus::Responded)
        .unwrap();
    assert!(responded.read);
    assert_eq!(notifications.sos_count(), 0);
    assert_eq!(notifications.snapshot().len(), 3);

    assert_eq!(notifications.mark_all_read(), 2);
    assert_eq!(notifications.unread_count(), 0);
    notifications.clear();
    assert!(notifications.snapshot().is_empty());
}
