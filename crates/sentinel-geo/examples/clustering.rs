//! Cluster configuration
//!
//! Comparing the two cluster presets on the same set of points:
//! - `same_location`: every zoom clusters within 50 m
//! - `zoom_aware`: the radius follows the zoom level

use sentinel_geo::{Cluster, ClusterEngine, Coordinate, GeoConfigBuilder, Linkage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let points = [
        Coordinate::new(16.4100, 120.6000),
        Coordinate::new(16.4101, 120.6001),
        Coordinate::new(16.4120, 120.6010),
        Coordinate::new(16.4200, 120.6100),
        Coordinate::new(16.4500, 120.5500),
    ];

    for (label, builder) in [
        ("same_location", GeoConfigBuilder::same_location()),
        ("zoom_aware", GeoConfigBuilder::zoom_aware()),
        (
            "zoom_aware, seed linkage",
            GeoConfigBuilder::zoom_aware().linkage(Linkage::Seed),
        ),
    ] {
        let config = builder.try_build()?;
        let engine = ClusterEngine::new(config.cluster);
        println!("{label}:");
        for zoom in [12, 14, 16] {
            let clusters = engine.cluster(&points, zoom);
            let sizes: Vec<usize> = clusters.iter().map(Cluster::len).collect();
            println!(
                "  zoom {zoom:>2}: radius {:.3} km, cluster sizes {sizes:?}",
                config.cluster.effective_radius_km(zoom)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustering_example() {
        let _ = sentinel_geo::init_logging(tracing::Level::WARN);
        assert!(main().is_ok(), "Clustering example should run");
    }
}
