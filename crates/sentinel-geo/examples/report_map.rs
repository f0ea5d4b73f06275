//! Reports on the map
//!
//! The full pipeline from submission to markers:
//! - Submitting and approving reports through the store
//! - Placing approved reports (clusters and region groups)
//! - Describing the markers and the map view

use sentinel_geo::{
    Coordinate, GeoCore, Priority,
    store::{NewReport, ReportEvent},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let core = GeoCore::new_embedded()?;
    let (reports, notifications) = core.new_stores();
    let mut events = reports.subscribe();

    let submissions = [
        ("Flooded underpass", Some(Coordinate::new(16.4100, 120.6000)), "", Priority::High),
        ("Clogged drainage", Some(Coordinate::new(16.4101, 120.6001)), "", Priority::Medium),
        ("Fallen tree", Some(Coordinate::new(16.4500, 120.5500)), "", Priority::Low),
        ("Landslide on access road", None, "Irisan", Priority::High),
        ("Noise complaint", None, "Atlantis", Priority::Low),
    ];
    for (description, location, barangay, priority) in submissions {
        let report = reports.submit(NewReport {
            reporter_id: "citizen-1".into(),
            reporter_email: Some("citizen@example.com".into()),
            description: description.into(),
            barangay: barangay.into(),
            priority: Some(priority),
            location,
            ..NewReport::default()
        });
        reports.approve(&report.id);
    }

    let approved = reports.approved();
    let placement = core.place_reports(&approved, None);
    for marker in core.markers(&placement) {
        println!(
            "{:?} at {:.4}, {:.4} [{}] {}",
            marker.kind, marker.position.lat, marker.position.lng, marker.color, marker.label
        );
    }
    for group in &placement.unplaced {
        println!("Not placed: {} ({} reports)", group.name, group.reports.len());
    }

    let view = placement.fit_bounds();
    println!("Map view: {view:?}");

    let approvals = events
        .drain()
        .into_iter()
        .filter(|e| matches!(e, ReportEvent::Approved(_)))
        .count();
    println!(
        "{approvals} approvals published, {} unread notifications",
        notifications.unread_count()
    );

    Ok(())
}
