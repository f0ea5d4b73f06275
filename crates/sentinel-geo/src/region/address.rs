use tracing::{debug, warn};

use super::{Region, RegionResolver};
use crate::{error::GeocodeError, geo::Coordinate};

/// Structured address returned by a reverse geocoder for a map point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressHint {
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub quarter: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    /// Full comma-separated address line
    pub display_name: Option<String>,
}

impl AddressHint {
    /// Non-blank components that may name a region, most specific first.
    pub fn region_terms(&self) -> impl Iterator<Item = &str> {
        [
            &self.suburb,
            &self.district,
            &self.neighbourhood,
            &self.quarter,
            &self.village,
        ]
        .into_iter()
        .filter_map(|term| term.as_deref().map(str::trim))
        .filter(|term| !term.is_empty())
    }
}

/// External service turning a point into an address.
pub trait ReverseGeocoder {
    fn reverse(&self, point: Coordinate) -> Result<AddressHint, GeocodeError>;
}

impl<F> ReverseGeocoder for F
where
    F: Fn(Coordinate) -> Result<AddressHint, GeocodeError>,
{
    fn reverse(&self, point: Coordinate) -> Result<AddressHint, GeocodeError> {
        self(point)
    }
}

/// Which step of [`RegionResolver::infer_region`] produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceSource {
    AddressTerm,
    AddressLine,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferredRegion<'a> {
    pub region: &'a Region,
    pub source: InferenceSource,
}

impl RegionResolver {
    /// Best region for a point picked on the map.
    ///
    /// The geocoder is asked once. Its failure is logged and treated as "no
    /// address". Address components are matched first, then the full address
    /// line, then the strict nearest region.
    pub fn infer_region<G>(&self, geocoder: &G, point: Coordinate) -> Option<InferredRegion<'_>>
    where
        G: ReverseGeocoder + ?Sized,
    {
        let hint = geocoder
            .reverse(point)
            .inspect_err(|e| {
                warn!(lat = point.lat, lng = point.lng, error = %e, "Reverse geocoding failed, using geometry only");
            })
            .ok();
        self.infer_from_hint(hint.as_ref(), point)
    }

    /// [`Self::infer_region`] with an address already in hand (or none).
    #[must_use]
    pub fn infer_from_hint(
        &self,
        hint: Option<&AddressHint>,
        point: Coordinate,
    ) -> Option<InferredRegion<'_>> {
        let by_address = hint.and_then(|hint| {
            hint.region_terms()
                .find_map(|term| self.match_address_term(term))
                .map(|region| (region, InferenceSource::AddressTerm))
                .or_else(|| {
                    hint.display_name
                        .as_deref()
                        .and_then(|line| self.match_address_line(line))
                        .map(|region| (region, InferenceSource::AddressLine))
                })
        });

        let (region, source) = by_address.or_else(|| {
            self.nearest_region_strict(point)
                .map(|region| (region, InferenceSource::Nearest))
        })?;
        debug!(region = region.name(), ?source, "Inferred region");
        Some(InferredRegion { region, source })
    }
}
