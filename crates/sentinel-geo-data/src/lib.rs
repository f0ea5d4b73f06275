//! Region data for the Mountain Sentinel geo core.
//!
//! This crate owns the single region/landmark asset that every consumer reads,
//! plus the tooling policy around it: bounding-box validation, swapped
//! coordinate detection, extraction of legacy hand-written tables and
//! cross-table diffing.

use std::path::PathBuf;

use tracing::{info, warn};

pub mod asset;
pub mod diff;
mod error;
pub mod extract;
pub mod fixtures;
pub mod report;
pub mod validate;

pub use asset::{Bounds, LandmarkRecord, RegionAsset, RegionRecord};
pub use diff::{DEFAULT_DIFF_TOLERANCE, TableDiff, diff_tables};
pub use error::{DataError, Result};
pub use extract::extract_centroids;
pub use fixtures::{FixtureConfig, create_fixture_asset};
pub use report::{LegacyComparison, ValidationReport};
pub use validate::{CentroidIssue, IssueKind, check_centroid, check_centroids, validate_asset};

/// Environment variable naming an alternate asset file.
pub const REGION_TABLE_ENV: &str = "SENTINEL_REGION_TABLE";

/// The asset shipped with the library.
pub const EMBEDDED_ASSET: &str = include_str!("../data/baguio.json");

/// Parse the embedded asset.
pub fn load_embedded() -> Result<RegionAsset> {
    RegionAsset::from_json_str(EMBEDDED_ASSET)
}

/// Path from [`REGION_TABLE_ENV`], if set to something non-empty.
#[must_use]
pub fn asset_path_from_env() -> Option<PathBuf> {
    std::env::var_os(REGION_TABLE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load the asset named by [`REGION_TABLE_ENV`], or the embedded one.
///
/// A configured file that fails to load is an error, never a fallback.
pub fn load_configured() -> Result<RegionAsset> {
    match asset_path_from_env() {
        Some(path) => {
            info!(path = ?path, "Using region asset from {}", REGION_TABLE_ENV);
            RegionAsset::from_path(&path).inspect_err(|e| {
                warn!(path = ?path, error = %e, "Configured region asset failed to load");
            })
        }
        None => load_embedded(),
    }
}
