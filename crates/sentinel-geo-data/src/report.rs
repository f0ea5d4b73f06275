use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    asset::{RegionAsset, RegionRecord},
    diff::{TableDiff, diff_tables},
    error::Result,
    validate::{CentroidIssue, check_centroids, validate_asset},
};

/// Result of comparing a legacy hand-written table against the asset.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyComparison {
    /// Where the legacy table came from (file path or label).
    pub source: String,
    pub count: usize,
    pub issues: Vec<CentroidIssue>,
    pub diffs: Vec<TableDiff>,
}

/// JSON-serialisable outcome of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub asset_version: String,
    pub region_count: usize,
    pub landmark_count: usize,
    pub issues: Vec<CentroidIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub legacy: Vec<LegacyComparison>,
}

impl ValidationReport {
    #[must_use]
    pub fn for_asset(asset: &RegionAsset) -> Self {
        Self {
            generated_at: Utc::now(),
            asset_version: asset.version.clone(),
            region_count: asset.regions.len(),
            landmark_count: asset.landmarks.len(),
            issues: validate_asset(asset),
            legacy: Vec::new(),
        }
    }

    /// Range-check `legacy` and diff it against the asset.
    pub fn add_legacy_table(
        &mut self,
        asset: &RegionAsset,
        source: impl Into<String>,
        legacy: &[RegionRecord],
        tolerance: f64,
    ) -> &LegacyComparison {
        self.legacy.push(LegacyComparison {
            source: source.into(),
            count: legacy.len(),
            issues: check_centroids(legacy, &asset.bounds),
            diffs: diff_tables(&asset.regions, legacy, tolerance),
        });
        &self.legacy[self.legacy.len() - 1]
    }

    /// True when neither the asset nor any compared table has a finding.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
            && self
                .legacy
                .iter()
                .all(|l| l.issues.is_empty() && l.diffs.is_empty())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        info!(path = ?path, clean = self.is_clean(), "Validation report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diff::DEFAULT_DIFF_TOLERANCE,
        fixtures::{FixtureConfig, create_fixture_asset},
    };

    #[test]
    fn test_clean_fixture_report() {
        let asset = create_fixture_asset(&FixtureConfig::minimal());
        let report = ValidationReport::for_asset(&asset);
        assert!(report.is_clean());
        assert_eq!(report.region_count, asset.regions.len());
    }

    #[test]
    fn test_legacy_diff_makes_report_dirty() {
        let asset = create_fixture_asset(&FixtureConfig::minimal());
        let mut legacy = asset.regions.clone();
        legacy[0].lat += 0.01;
        legacy.pop();

        let mut report = ValidationReport::for_asset(&asset);
        let comparison = report.add_legacy_table(&asset, "legacy.ts", &legacy, DEFAULT_DIFF_TOLERANCE);
        assert_eq!(comparison.diffs.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation.json");
        let asset = create_fixture_asset(&FixtureConfig::minimal());

        ValidationReport::for_asset(&asset).write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["region_count"], asset.regions.len());
        assert!(value["issues"].as_array().unwrap().is_empty());
        assert!(value.get("legacy").is_none());
    }
}
