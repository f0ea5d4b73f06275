use crate::{
    error::{GeoError, Result},
    geo::BoundingBox,
};

/// How a cluster decides whether to absorb another report.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Within radius of the seed and of every member already absorbed.
    ///
    /// No two members of a cluster are ever further apart than the radius.
    #[default]
    Complete,
    /// Within radius of the seed only. Two members may sit up to twice the
    /// radius apart.
    Seed,
}

/// Cluster radius policy: a zoom step function capped by an optional ceiling.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterPolicy {
    /// Zoom at or above which `street_radius_km` applies
    pub street_zoom: u8,
    /// Zoom at or above which `district_radius_km` applies
    pub district_zoom: u8,
    pub street_radius_km: f64,
    pub district_radius_km: f64,
    pub city_radius_km: f64,
    /// Hard cap on the radius whatever the zoom
    pub radius_ceiling_km: Option<f64>,
    pub linkage: Linkage,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self {
            street_zoom: 15,
            district_zoom: 13,
            street_radius_km: 0.25,
            district_radius_km: 0.5,
            city_radius_km: 1.5,
            radius_ceiling_km: Some(0.05),
            linkage: Linkage::Complete,
        }
    }
}

impl ClusterPolicy {
    /// Step-function radius for a zoom level, before the ceiling.
    #[must_use]
    pub fn radius_for_zoom(&self, zoom: u8) -> f64 {
        if zoom >= self.street_zoom {
            self.street_radius_km
        } else if zoom >= self.district_zoom {
            self.district_radius_km
        } else {
            self.city_radius_km
        }
    }

    /// Radius actually used for absorption at `zoom`.
    #[must_use]
    pub fn effective_radius_km(&self, zoom: u8) -> f64 {
        let step = self.radius_for_zoom(zoom);
        self.radius_ceiling_km.map_or(step, |ceiling| step.min(ceiling))
    }

    fn validate(&self) -> Result<()> {
        let radii = [
            ("street_radius_km", Some(self.street_radius_km)),
            ("district_radius_km", Some(self.district_radius_km)),
            ("city_radius_km", Some(self.city_radius_km)),
            ("radius_ceiling_km", self.radius_ceiling_km),
        ];
        for (name, value) in radii {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(GeoError::ConfigError(format!(
                    "{name} must be a positive distance, got {v}"
                )));
            }
        }
        if self.street_zoom < self.district_zoom {
            return Err(GeoError::ConfigError(format!(
                "street_zoom ({}) must not be below district_zoom ({})",
                self.street_zoom, self.district_zoom
            )));
        }
        Ok(())
    }
}

/// Every tunable of the geo core.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeoConfig {
    /// Fallback map view; `None` uses the bounds of the region table
    pub bounds: Option<BoundingBox>,
    /// Euclidean cutoff (decimal degrees) of the strict nearest-region lookup
    pub strict_cutoff_deg: f64,
    pub cluster: ClusterPolicy,
    /// Maximum number of search suggestions
    pub suggestion_limit: usize,
    pub nearby_radius_km: f64,
    /// Query words shorter than this are ignored by word-level matching
    pub min_word_len: usize,
    /// Clamp word-level match scores to 100
    pub clamp_scores: bool,
    pub default_zoom: u8,
    /// Per-subscriber buffer of the report/notification channels
    pub event_capacity: usize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            bounds: None,
            strict_cutoff_deg: 0.02,
            cluster: ClusterPolicy::default(),
            suggestion_limit: 12,
            nearby_radius_km: 1.0,
            min_word_len: 4,
            clamp_scores: true,
            default_zoom: 13,
            event_capacity: 64,
        }
    }
}

impl GeoConfig {
    #[must_use]
    pub fn builder() -> GeoConfigBuilder {
        GeoConfigBuilder::new()
    }

    /// Check the invariants that [`GeoConfigBuilder::try_build`] enforces.
    pub fn validate(&self) -> Result<()> {
        if let Some(bounds) = self.bounds.filter(|b| !b.is_well_formed()) {
            return Err(GeoError::ConfigError(format!(
                "bounds are inverted: {bounds:?}"
            )));
        }
        if !(self.strict_cutoff_deg.is_finite() && self.strict_cutoff_deg > 0.0) {
            return Err(GeoError::ConfigError(format!(
                "strict_cutoff_deg must be positive, got {}",
                self.strict_cutoff_deg
            )));
        }
        if !(self.nearby_radius_km.is_finite() && self.nearby_radius_km > 0.0) {
            return Err(GeoError::ConfigError(format!(
                "nearby_radius_km must be positive, got {}",
                self.nearby_radius_km
            )));
        }
        if self.suggestion_limit == 0 {
            return Err(GeoError::ConfigError(
                "suggestion_limit must be at least 1".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(GeoError::ConfigError(
                "event_capacity must be at least 1".into(),
            ));
        }
        self.cluster.validate()
    }
}

/// Builder for [`GeoConfig`] with presets for the two cluster policies
#[derive(Debug, Clone, Default)]
pub struct GeoConfigBuilder {
    config: GeoConfig,
}

impl GeoConfigBuilder {
    /// Create a new builder with the default (same-location) policy
    pub fn new() -> Self {
        Self {
            config: GeoConfig::default(),
        }
    }

    /// Reports only merge when within 50 m of each other, whatever the zoom
    pub fn same_location() -> Self {
        Self::new()
    }

    /// Drop the ceiling so the zoom step function decides the radius
    pub fn zoom_aware() -> Self {
        let mut builder = Self::new();
        builder.config.cluster.radius_ceiling_km = None;
        builder
    }

    /// Override the table's bounds as the fallback map view
    pub fn bounds(mut self, bounds: impl Into<BoundingBox>) -> Self {
        self.config.bounds = Some(bounds.into());
        self
    }

    /// Set the strict nearest-region cutoff in decimal degrees
    pub fn strict_cutoff(mut self, degrees: f64) -> Self {
        self.config.strict_cutoff_deg = degrees;
        self
    }

    /// Replace the whole cluster policy
    pub fn cluster_policy(mut self, policy: ClusterPolicy) -> Self {
        self.config.cluster = policy;
        self
    }

    /// Set or remove the cluster radius ceiling
    pub fn radius_ceiling(mut self, ceiling_km: Option<f64>) -> Self {
        self.config.cluster.radius_ceiling_km = ceiling_km;
        self
    }

    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.config.cluster.linkage = linkage;
        self
    }

    /// Set the maximum number of search suggestions
    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.config.suggestion_limit = limit;
        self
    }

    pub fn nearby_radius(mut self, radius_km: f64) -> Self {
        self.config.nearby_radius_km = radius_km;
        self
    }

    /// Shortest query word (in characters) that word-level matching considers
    pub fn min_word_len(mut self, len: usize) -> Self {
        self.config.min_word_len = len;
        self
    }

    /// Enable or disable clamping word-level scores to 100
    pub fn clamp_scores(mut self, clamp: bool) -> Self {
        self.config.clamp_scores = clamp;
        self
    }

    pub fn default_zoom(mut self, zoom: u8) -> Self {
        self.config.default_zoom = zoom;
        self
    }

    /// Buffer size of each store subscriber before it starts lagging
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Build the final configuration without validation
    pub fn build(self) -> GeoConfig {
        self.config
    }

    /// Build and validate the configuration
    pub fn try_build(self) -> Result<GeoConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
