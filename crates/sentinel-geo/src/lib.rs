//! Mountain Sentinel geo core.
//!
//! Resolves incident report locations against the barangay table of Baguio
//! City and decides how reports are placed on the map: geolocated reports are
//! clustered by proximity, reports without coordinates are grouped at their
//! region's centroid.
//!
//! # Quick Start
//!
//! ```rust
//! use sentinel_geo::{Coordinate, GeoCore};
//!
//! let core = GeoCore::new_embedded()?;
//!
//! // Point to region
//! let region = core.nearest_region(Coordinate::new(16.4125, 120.5964));
//! assert_eq!(region.map(|r| r.name()), Some("Session Road Area"));
//!
//! // Free-text name to centroid, case-insensitive
//! assert_eq!(
//!     core.centroid_of("session road area"),
//!     Some(Coordinate::new(16.4125, 120.5964))
//! );
//!
//! // Autocomplete
//! let suggestions = core.search("burnham");
//! assert_eq!(suggestions[0].name, "Burnham Road");
//! # Ok::<(), sentinel_geo::error::GeoError>(())
//! ```
//!
//! # Data
//!
//! The region table is compiled into the library from the
//! [`sentinel_geo_data`] asset. Set `SENTINEL_REGION_TABLE` to the path of
//! another asset file to load that instead.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod cluster;
mod config;
mod core;
pub mod error;
mod geo;
mod marker;
mod matcher;
mod placement;
mod region;
mod report;
mod search;
pub mod store;

pub use crate::core::{GeoCore, GeoCoreBuilder};

pub use cluster::{Cluster, ClusterEngine, Geolocated, GeolocatedReport};
pub use config::{ClusterPolicy, GeoConfig, GeoConfigBuilder, Linkage};
pub use geo::{BoundingBox, Coordinate, EARTH_RADIUS_KM, distance_km, euclidean_degrees};
pub use marker::{MapMarker, MarkerKind, REGION_GROUP_COLOR, present};
pub use matcher::{NameMatcher, match_score};
pub use placement::{Placement, RegionGroup, UNKNOWN_LOCATION, UnplacedGroup, place_reports};
pub use region::{
    AddressHint, InferenceSource, InferredRegion, Landmark, Region, RegionResolver, RegionTable,
    ReverseGeocoder, alias_stripped,
};
pub use report::{
    ADMIN_REPORTER, Priority, Report, ReportFilter, ReportStatus, UNKNOWN_PRIORITY_COLOR,
    UNKNOWN_PRIORITY_TAG,
};
pub use search::{LocationSearch, LocationSuggestion, SuggestionKind};
pub use sentinel_geo_data as data;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install a `fmt` subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence when set. Safe to call more than once; only the
/// first call installs anything.
///
/// ```rust
/// use sentinel_geo::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), sentinel_geo::error::GeoError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeoError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    })
}
