use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use sentinel_geo_data::{
    DEFAULT_DIFF_TOLERANCE, IssueKind, RegionAsset, TableDiff, ValidationReport,
    extract_centroids, load_configured,
};
use tracing::{Level, error, info};
use tracing_subscriber::fmt::format::FmtSpan;

/// Validate the region asset and compare legacy centroid tables against it
#[derive(Parser, Debug)]
#[command(name = "validate-regions", version, about)]
struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Asset to validate (defaults to $SENTINEL_REGION_TABLE, else the embedded asset)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    asset: Option<PathBuf>,

    /// Source files holding a hand-written centroid table to diff against the asset
    #[arg(long = "legacy", value_hint = clap::ValueHint::FilePath)]
    legacy: Vec<PathBuf>,

    /// Variable name of the legacy table
    #[arg(long, default_value = "BARANGAY_CENTROIDS")]
    var_name: String,

    /// Per-component tolerance in degrees when diffing
    #[arg(long, default_value_t = DEFAULT_DIFF_TOLERANCE)]
    tolerance: f64,

    /// Where to write the JSON report
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> sentinel_geo_data::Result<bool> {
    let asset = match &cli.asset {
        Some(path) => RegionAsset::from_path(path)?,
        None => load_configured()?,
    };
    info!(
        "Found {} regions and {} landmarks in asset {}",
        asset.regions.len(),
        asset.landmarks.len(),
        asset.version
    );

    let mut report = ValidationReport::for_asset(&asset);
    summarize_issues("asset", &report.issues);

    for path in &cli.legacy {
        let source = fs::read_to_string(path)?;
        let legacy = extract_centroids(&source, &cli.var_name)?;
        let label = path.display().to_string();
        info!("Found {} centroids in {label}", legacy.len());

        let comparison = report.add_legacy_table(&asset, &label, &legacy, cli.tolerance);
        summarize_issues(&label, &comparison.issues);
        summarize_diffs(&label, &comparison.diffs);
    }

    if let Some(output) = &cli.output {
        report.write_json(output)?;
        info!("Validation JSON written to {}", output.display());
    }

    Ok(report.is_clean())
}

fn summarize_issues(label: &str, issues: &[sentinel_geo_data::CentroidIssue]) {
    if issues.is_empty() {
        info!("No range/swapped issues detected in {label}.");
        return;
    }
    info!("Issues in {label}:");
    for issue in issues {
        match &issue.kind {
            IssueKind::OutOfRange { swapped: true, .. } => info!(
                "  - {}: coordinates appear swapped (lat={}, lng={})",
                issue.name, issue.lat, issue.lng
            ),
            IssueKind::OutOfRange { .. } => info!(
                "  - {}: out-of-range (lat={}, lng={})",
                issue.name, issue.lat, issue.lng
            ),
            IssueKind::DuplicateName => info!("  - {}: duplicate name", issue.name),
            IssueKind::UnknownLandmarkRegion { region } => {
                info!("  - {}: landmark refers to unknown region {region}", issue.name);
            }
        }
    }
}

fn summarize_diffs(label: &str, diffs: &[TableDiff]) {
    if diffs.is_empty() {
        info!("No coordinate mismatches between asset and {label}.");
        return;
    }
    info!("Coordinate differences between asset and {label}:");
    for diff in diffs {
        match diff {
            TableDiff::MissingInOne { name, left, .. } => {
                let side = if left.is_some() { "asset" } else { label };
                info!("  - {name}: present only in {side}");
            }
            TableDiff::CoordsMismatch {
                name,
                left,
                right,
                d_lat,
                d_lng,
            } => info!(
                "  - {name}: asset={left:?}, {label}={right:?} (dLat={d_lat:.4}, dLng={d_lng:.4})"
            ),
        }
    }
}
