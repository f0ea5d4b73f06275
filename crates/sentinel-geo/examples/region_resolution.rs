//! Region resolution
//!
//! Turning a map click or a typed barangay name into a region:
//! - Nearest region, lenient and strict
//! - Tiered name lookup
//! - Inference from a reverse-geocoded address, with a fallback when the
//!   geocoder is down

use sentinel_geo::{AddressHint, Coordinate, GeoCore, error::GeocodeError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let core = GeoCore::new_embedded()?;

    let click = Coordinate::new(16.4131, 120.5970);
    if let Some(region) = core.nearest_region(click) {
        println!("Nearest region to {click:?}: {}", region.name());
    }

    // Outside the city: the lenient lookup still answers, the strict one does not
    let far = Coordinate::new(16.60, 120.90);
    println!(
        "Far point: lenient = {:?}, strict = {:?}",
        core.nearest_region(far).map(|r| r.name()),
        core.nearest_region_strict(far).map(|r| r.name())
    );

    for name in ["Session Road Area", "session road area", "Marcoville", "Atlantis"] {
        match core.centroid_of(name) {
            Some(c) => println!("'{name}' -> {:.4}, {:.4}", c.lat, c.lng),
            None => println!("'{name}' -> no match"),
        }
    }

    // A stand-in for the real HTTP geocoder
    let geocoder = |_: Coordinate| -> Result<AddressHint, GeocodeError> {
        Ok(AddressHint {
            road: Some("Naguilian Road".into()),
            suburb: Some("Irisan".into()),
            display_name: Some("Naguilian Road, Irisan, Baguio, Benguet".into()),
            ..AddressHint::default()
        })
    };
    let offline =
        |_: Coordinate| -> Result<AddressHint, GeocodeError> { Err(GeocodeError::Timeout(5_000)) };

    let point = Coordinate::new(16.4083, 120.5606);
    for (label, inferred) in [
        ("online", core.infer_region(&geocoder, point)),
        ("offline", core.infer_region(&offline, point)),
    ] {
        if let Some(inferred) = inferred {
            println!(
                "Inferred ({label}): {} via {:?}",
                inferred.region.name(),
                inferred.source
            );
        }
    }

    Ok(())
}
