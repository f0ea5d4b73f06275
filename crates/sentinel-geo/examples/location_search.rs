//! Location autocomplete
//!
//! This example demonstrates the search operations behind the location field
//! of the report form:
//! - Free-text suggestions over barangays, streets and landmarks
//! - Looking up a coordinate by name
//! - Regions near a point

use sentinel_geo::{Coordinate, GeoCore, LocationSuggestion, SuggestionKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let core = GeoCore::new_embedded()?;

    for query in ["session", "burnham", "camp 7", "mines"] {
        println!("Suggestions for '{query}':");
        print_suggestions(&core.search(query), 5);
    }

    if let Some(point) = core.coordinates_of("Burnham Road") {
        println!("\nBurnham Road is at {:.4}, {:.4}", point.lat, point.lng);
    }

    println!("\nWithin 1 km of Session Road:");
    print_suggestions(&core.nearby(Coordinate::new(16.4125, 120.5964), None), 5);

    Ok(())
}

fn print_suggestions(suggestions: &[LocationSuggestion], limit: usize) {
    for (i, s) in suggestions.iter().take(limit).enumerate() {
        let kind = match s.kind {
            SuggestionKind::Region => "Region",
            SuggestionKind::Landmark => "Landmark",
        };
        println!(
            "  {}. {} ({kind}, in {}) - Score: {:.1}",
            i + 1,
            s.name,
            s.region,
            s.score
        );
    }

    if suggestions.len() > limit {
        println!("  ... and {} more", suggestions.len() - limit);
    }
}
