use std::sync::Arc;

use tracing::{debug, trace};

use super::{Region, RegionTable};
use crate::{
    config::GeoConfig,
    geo::{Coordinate, distance_km, euclidean_degrees},
};

/// Point-to-region and name-to-region resolution over a shared table.
///
/// Every lookup answers "no match" with `None`; nothing here fails.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    table: Arc<RegionTable>,
    strict_cutoff_deg: f64,
    min_word_len: usize,
}

impl RegionResolver {
    #[must_use]
    pub fn new(table: Arc<RegionTable>, config: &GeoConfig) -> Self {
        Self {
            table,
            strict_cutoff_deg: config.strict_cutoff_deg,
            min_word_len: config.min_word_len,
        }
    }

    #[must_use]
    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    /// Closest region by great-circle distance, with that distance in km.
    ///
    /// Ties go to the region that comes first in table order. `None` only for
    /// an empty table.
    #[must_use]
    pub fn nearest_region_with_distance(&self, point: Coordinate) -> Option<(&Region, f64)> {
        self.table
            .iter()
            .map(|region| (region, distance_km(point, region.centroid())))
            .fold(None, |best, (region, d)| match best {
                Some((_, best_d)) if d.total_cmp(&best_d).is_ge() => best,
                _ => Some((region, d)),
            })
    }

    /// Lenient lookup: always some region when the table is non-empty.
    #[must_use]
    pub fn nearest_region(&self, point: Coordinate) -> Option<&Region> {
        self.nearest_region_with_distance(point).map(|(r, _)| r)
    }

    /// Strict lookup: the nearest region, unless its centroid is at least
    /// `strict_cutoff_deg` (Euclidean, in degrees) away from `point`.
    #[must_use]
    pub fn nearest_region_strict(&self, point: Coordinate) -> Option<&Region> {
        let (region, d_km) = self.nearest_region_with_distance(point)?;
        let d_deg = euclidean_degrees(point, region.centroid());
        if d_deg < self.strict_cutoff_deg {
            Some(region)
        } else {
            debug!(
                nearest = region.name(),
                distance_km = d_km,
                distance_deg = d_deg,
                "No region within strict cutoff"
            );
            None
        }
    }

    /// Three-tier name lookup: exact, case-insensitive exact, then
    /// case-insensitive containment in either direction (alias-stripped
    /// names included). The first hit in table order wins within a tier.
    #[must_use]
    pub fn region_named(&self, name: &str) -> Option<&Region> {
        let query = name.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(region) = self.table.get(query) {
            return Some(region);
        }

        let query = query.to_lowercase();
        let found = self
            .table
            .iter()
            .find(|r| r.name_lower() == query)
            .or_else(|| {
                self.table.iter().find(|r| {
                    r.name_lower().contains(&query)
                        || query.contains(r.name_lower())
                        || (!r.base_lower().is_empty() && query.contains(r.base_lower()))
                })
            });
        trace!(query = %query, found = ?found.map(Region::name), "Region name lookup");
        found
    }

    /// Centroid of the region [`Self::region_named`] resolves to.
    #[must_use]
    pub fn centroid_of(&self, name: &str) -> Option<Coordinate> {
        self.region_named(name).map(Region::centroid)
    }

    /// Match one free-text address component (suburb, district, ...) to a region.
    ///
    /// Case-insensitive. A region matches when its name contains the term, the
    /// term contains its alias-stripped name, its alias-stripped name contains
    /// the term, or it contains any long-enough word of the term.
    #[must_use]
    pub fn match_address_term(&self, term: &str) -> Option<&Region> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        let words: Vec<&str> = term
            .split_whitespace()
            .filter(|w| w.chars().count() >= self.min_word_len)
            .collect();

        self.table.iter().find(|r| {
            let base = r.base_lower();
            r.name_lower().contains(&term)
                || (!base.is_empty() && (term.contains(base) || base.contains(&term)))
                || words.iter().any(|w| base.contains(w))
        })
    }

    /// Match a comma-separated display address. Parts are tried left to right
    /// and the first part naming a region wins.
    #[must_use]
    pub fn match_address_line(&self, line: &str) -> Option<&Region> {
        line.split(',')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .find_map(|part| {
                self.table.iter().find(|r| {
                    r.name_lower().contains(&part)
                        || (!r.base_lower().is_empty() && part.contains(r.base_lower()))
                })
            })
    }

    /// Regions within `radius_km` of `point`, closest first.
    #[must_use]
    pub fn regions_within(&self, point: Coordinate, radius_km: f64) -> Vec<(&Region, f64)> {
        let mut hits: Vec<(&Region, f64)> = self
            .table
            .iter()
            .map(|r| (r, distance_km(point, r.centroid())))
            .filter(|&(_, d)| d <= radius_km)
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

#[cfg(test)]
mod tests {
    use sentinel_geo_data::{FixtureConfig, RegionAsset, RegionRecord, create_fixture_asset};

    use super::*;

    fn resolver() -> RegionResolver {
        let table = RegionTable::from_asset(&create_fixture_asset(&FixtureConfig::sample()));
        RegionResolver::new(Arc::new(table), &GeoConfig::default())
    }

    fn single_region(name: &str, lat: f64, lng: f64) -> RegionResolver {
        let mut asset = create_fixture_asset(&FixtureConfig::minimal());
        asset.regions = vec![RegionRecord::new(name, lat, lng)];
        asset.landmarks.clear();
        RegionResolver::new(
            Arc::new(RegionTable::from_asset(&asset)),
            &GeoConfig::default(),
        )
    }

    #[test]
    fn test_nearest_at_centroid_is_that_region() {
        let resolver = resolver();
        for region in resolver.table().iter() {
            let (found, d) = resolver
                .nearest_region_with_distance(region.centroid())
                .unwrap();
            assert_eq!(found.name(), region.name());
            assert_eq!(d, 0.0);
        }
    }

    #[test]
    fn test_nearest_tie_goes_to_table_order() {
        let mut asset: RegionAsset = create_fixture_asset(&FixtureConfig::minimal());
        asset.regions = vec![
            RegionRecord::new("West", 16.25, 120.5),
            RegionRecord::new("East", 16.25, 120.75),
        ];
        asset.landmarks.clear();
        let resolver = RegionResolver::new(
            Arc::new(RegionTable::from_asset(&asset)),
            &GeoConfig::default(),
        );
        let midpoint = Coordinate::new(16.25, 120.625);
        assert_eq!(resolver.nearest_region(midpoint).unwrap().name(), "West");
    }

    #[test]
    fn test_lenient_always_answers_strict_may_not() {
        let resolver = resolver();
        let far = Coordinate::new(16.47, 120.53);
        assert!(resolver.nearest_region(far).is_some());
        assert!(resolver.nearest_region_strict(far).is_none());

        let near_session = Coordinate::new(16.4130, 120.5970);
        assert_eq!(
            resolver.nearest_region_strict(near_session).unwrap().name(),
            "Session Road Area"
        );
    }

    #[test]
    fn test_strict_cutoff_rejects_distant_points() {
        let resolver = single_region("Only", 16.40, 120.60);
        assert!(resolver.nearest_region_strict(Coordinate::new(16.41, 120.60)).is_some());
        assert!(resolver.nearest_region_strict(Coordinate::new(16.43, 120.60)).is_none());
    }

    #[test]
    fn test_centroid_case_insensitive() {
        let resolver = single_region("Session Road Area", 16.4125, 120.5964);
        assert_eq!(
            resolver.centroid_of("session road area"),
            Some(Coordinate::new(16.4125, 120.5964))
        );
    }

    #[test]
    fn test_centroid_tiers() {
        let resolver = resolver();
        assert_eq!(resolver.region_named("Irisan").unwrap().name(), "Irisan");
        assert_eq!(resolver.region_named("  KIAS ").unwrap().name(), "Kias");
        // candidate contains query
        assert_eq!(resolver.region_named("mines view").unwrap().name(), "Mines View Park");
        // query contains the alias-stripped name
        assert_eq!(
            resolver.region_named("Bal-Marcoville Proper").unwrap().name(),
            "Bal-Marcoville (Marcoville)"
        );
        // query contains the full canonical name
        assert_eq!(
            resolver.region_named("Purok 2, Pacdal, Baguio").unwrap().name(),
            "Pacdal"
        );
    }

    #[test]
    fn test_centroid_no_match() {
        let resolver = resolver();
        assert_eq!(resolver.centroid_of("Nonexistent Place"), None);
        assert_eq!(resolver.centroid_of(""), None);
        assert_eq!(resolver.centroid_of("   "), None);
    }

    #[test]
    fn test_match_address_term() {
        let resolver = resolver();
        assert_eq!(resolver.match_address_term("Irisan").unwrap().name(), "Irisan");
        assert_eq!(
            resolver.match_address_term("Marcoville").unwrap().name(),
            "Bal-Marcoville (Marcoville)"
        );
        // one long word contained in the base name
        assert_eq!(
            resolver.match_address_term("Barangay Loakan").unwrap().name(),
            "Loakan Proper"
        );
        assert!(resolver.match_address_term("Benguet").is_none());
        assert!(resolver.match_address_term(" ").is_none());
    }

    #[test]
    fn test_match_address_line_takes_first_matching_part() {
        let resolver = resolver();
        let line = "Upper Session Road, Session Road Area, Baguio, Benguet, 2600, Philippines";
        assert_eq!(
            resolver.match_address_line(line).unwrap().name(),
            "Session Road Area"
        );
        assert_eq!(
            resolver.match_address_line("Km 4, Kias, Baguio").unwrap().name(),
            "Kias"
        );
        assert!(resolver.match_address_line("Benguet, Philippines").is_none());
    }

    #[test]
    fn test_regions_within_sorted_by_distance() {
        let resolver = resolver();
        let hits = resolver.regions_within(Coordinate::new(16.4125, 120.5964), 0.5);
        assert_eq!(hits[0].0.name(), "Session Road Area");
        assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(hits.iter().all(|&(_, d)| d <= 0.5));
    }
}
