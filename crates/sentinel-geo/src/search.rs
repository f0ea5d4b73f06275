//! Autocomplete over regions, streets and landmarks.

use std::sync::Arc;

use itertools::Itertools;
use rapidfuzz::distance::levenshtein;
use tracing::{debug, instrument};

use crate::{
    config::GeoConfig,
    geo::Coordinate,
    matcher::NameMatcher,
    region::{RegionResolver, RegionTable},
};

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Region,
    Landmark,
}

/// One autocomplete entry.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSuggestion {
    pub name: String,
    /// Region the suggestion belongs to; a region's own name for regions
    pub region: String,
    pub coordinate: Coordinate,
    pub kind: SuggestionKind,
    pub score: f64,
}

/// Free-text location search over one region table.
#[derive(Debug, Clone)]
pub struct LocationSearch {
    resolver: RegionResolver,
    matcher: NameMatcher,
    limit: usize,
    nearby_radius_km: f64,
}

impl LocationSearch {
    #[must_use]
    pub fn new(table: Arc<RegionTable>, config: &GeoConfig) -> Self {
        Self {
            resolver: RegionResolver::new(table, config),
            matcher: NameMatcher::from_config(config),
            limit: config.suggestion_limit,
            nearby_radius_km: config.nearby_radius_km,
        }
    }

    fn table(&self) -> &RegionTable {
        self.resolver.table()
    }

    fn candidates(&self) -> impl Iterator<Item = LocationSuggestion> + '_ {
        let regions = self.table().iter().map(|r| LocationSuggestion {
            name: r.name().to_string(),
            region: r.name().to_string(),
            coordinate: r.centroid(),
            kind: SuggestionKind::Region,
            score: 0.0,
        });
        let landmarks = self.table().landmarks().iter().map(|l| LocationSuggestion {
            name: l.name.clone(),
            region: l.region.clone(),
            coordinate: l.coordinate,
            kind: SuggestionKind::Landmark,
            score: 0.0,
        });
        regions.chain(landmarks)
    }

    /// Suggestions for `query`, best first, at most the configured limit.
    ///
    /// Equal scores are ordered by edit-distance similarity to the query, then
    /// by table order (regions before landmarks). Ranking is therefore not a
    /// plain stable sort on score: when more entries tie than the limit allows,
    /// the closer spellings are kept rather than the earliest ones.
    #[instrument(name = "Location search", level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> Vec<LocationSuggestion> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        let results: Vec<LocationSuggestion> = self
            .candidates()
            .filter_map(|mut s| {
                let score = self.matcher.score(query, &s.name);
                (score > 0).then(|| {
                    s.score = f64::from(score);
                    let similarity = levenshtein::normalized_similarity(
                        query_lower.chars(),
                        s.name.to_lowercase().chars(),
                    );
                    (s, similarity)
                })
            })
            .sorted_by(|(a, sim_a), (b, sim_b)| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| sim_b.total_cmp(sim_a))
            })
            .map(|(s, _)| s)
            .take(self.limit)
            .collect();

        debug!(results = results.len(), "Search complete");
        results
    }

    /// Coordinate for an exact region name, else a case-insensitive landmark name.
    #[must_use]
    pub fn coordinates_of(&self, name: &str) -> Option<Coordinate> {
        if let Some(region) = self.table().get(name) {
            return Some(region.centroid());
        }
        let lower = name.to_lowercase();
        self.table()
            .landmarks()
            .iter()
            .find(|l| l.name.to_lowercase() == lower)
            .map(|l| l.coordinate)
    }

    /// Regions within `radius_km` (default from config), scored by closeness.
    ///
    /// A radius that is not a positive finite number matches nothing.
    #[must_use]
    pub fn nearby(&self, point: Coordinate, radius_km: Option<f64>) -> Vec<LocationSuggestion> {
        let radius = radius_km.unwrap_or(self.nearby_radius_km);
        if !(radius.is_finite() && radius > 0.0) {
            return Vec::new();
        }
        self.resolver
            .regions_within(point, radius)
            .into_iter()
            .map(|(r, d)| LocationSuggestion {
                name: r.name().to_string(),
                region: r.name().to_string(),
                coordinate: r.centroid(),
                kind: SuggestionKind::Region,
                score: 100.0 - d / radius * 100.0,
            })
            .collect()
    }

    /// Every region as a zero-score suggestion, in table order.
    #[must_use]
    pub fn all_regions(&self) -> Vec<LocationSuggestion> {
        self.candidates()
            .filter(|s| s.kind == SuggestionKind::Region)
            .collect()
    }
}
