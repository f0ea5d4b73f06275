//! Extraction of legacy centroid tables that were hand-written into source files.
//!
//! Legacy tables look like
//!
//! ```text
//! private readonly BARANGAY_CENTROIDS: { [key: string]: [number, number] } = {
//!   'Session Road Area': [16.4125, 120.5964],
//!   Ambiong: [16.4288, 120.6081],
//! };
//! ```
//!
//! Both quoted and bare keys are recognised.

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    asset::RegionRecord,
    error::{DataError, Result},
};

const ENTRY_PATTERN: &str = r#"(?:'([^']+)'|"([^"]+)"|([A-Za-z_]\w*))\s*:\s*\[\s*(-?[0-9.]+)\s*,\s*(-?[0-9.]+)\s*\]"#;

/// Pull the `name -> [lat, lng]` entries of table `var_name` out of `source`.
///
/// Entries keep their source order.
pub fn extract_centroids(source: &str, var_name: &str) -> Result<Vec<RegionRecord>> {
    let table_pattern = format!(
        r"(?s)\b{}\b(?:\s*:\s*\{{[^{{}}]*\}})?\s*[:=]\s*\{{(.*?)\}}\s*;",
        regex::escape(var_name)
    );
    let table_re = Regex::new(&table_pattern)?;
    let body = table_re
        .captures(source)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| DataError::LegacyTableNotFound(var_name.to_string()))?
        .as_str();

    let entry_re = Regex::new(ENTRY_PATTERN)?;
    let records: Vec<RegionRecord> = entry_re
        .captures_iter(body)
        .filter_map(|caps| {
            let name = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
            let lat = caps[4].parse::<f64>();
            let lng = caps[5].parse::<f64>();
            match (lat, lng) {
                (Ok(lat), Ok(lng)) => Some(RegionRecord::new(name.as_str(), lat, lng)),
                _ => {
                    warn!(name = name.as_str(), "Skipping legacy entry with unparsable coordinates");
                    None
                }
            }
        })
        .collect();

    debug!(var_name, entries = records.len(), "Extracted legacy centroid table");
    Ok(records)
}
