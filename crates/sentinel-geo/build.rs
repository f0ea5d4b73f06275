use sentinel_geo_data::{IssueKind, load_embedded, validate_asset};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tell cargo to rerun if the asset changes
    println!("cargo:rerun-if-changed=../sentinel-geo-data/data/");
    println!("cargo:rerun-if-changed=build.rs");

    // A structurally broken asset fails the build; range findings only warn
    let asset = load_embedded()?;
    let issues = validate_asset(&asset);

    if issues.is_empty() {
        return Ok(());
    }

    println!(
        "cargo:warning=Region asset {} has {} issue(s):",
        asset.version,
        issues.len()
    );
    for issue in &issues {
        let what = match &issue.kind {
            IssueKind::OutOfRange { swapped: true, .. } => "coordinates appear swapped".to_string(),
            IssueKind::OutOfRange { .. } => "out of municipal bounds".to_string(),
            IssueKind::DuplicateName => "duplicate name".to_string(),
            IssueKind::UnknownLandmarkRegion { region } => format!("unknown region `{region}`"),
        };
        println!(
            "cargo:warning=  {} ({}, {}): {what}",
            issue.name, issue.lat, issue.lng
        );
    }

    Ok(())
}
