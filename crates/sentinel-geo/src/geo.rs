//! Coordinates, bounding boxes and great-circle distance.

use sentinel_geo_data::Bounds;

/// Mean Earth radius used by [`distance_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the global lat/lng ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Legacy "no location captured" marker: either component exactly zero.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.lat == 0.0 || self.lng == 0.0
    }

    /// Arithmetic mean of the given coordinates, `None` when empty.
    pub fn mean<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let (count, lat, lng) = points
            .into_iter()
            .fold((0_usize, 0.0, 0.0), |(n, lat, lng), p| {
                (n + 1, lat + p.lat, lng + p.lng)
            });
        (count > 0).then(|| Self::new(lat / count as f64, lng / count as f64))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lng]
    }
}

/// Axis-aligned lat/lng rectangle, south-west to north-east.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(south_west: Coordinate, north_east: Coordinate) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest box holding every point, `None` when there are none.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |mut bbox, p| {
            bbox.south_west.lat = bbox.south_west.lat.min(p.lat);
            bbox.south_west.lng = bbox.south_west.lng.min(p.lng);
            bbox.north_east.lat = bbox.north_east.lat.max(p.lat);
            bbox.north_east.lng = bbox.north_east.lng.max(p.lng);
            bbox
        }))
    }

    /// Inclusive containment.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.south_west.lat <= self.north_east.lat && self.south_west.lng <= self.north_east.lng
    }
}

impl From<Bounds> for BoundingBox {
    fn from(b: Bounds) -> Self {
        Self::new(
            Coordinate::new(b.lat_min, b.lng_min),
            Coordinate::new(b.lat_max, b.lng_max),
        )
    }
}

/// Great-circle distance in kilometres (haversine, mean Earth radius).
///
/// No range checking: callers own input validation.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Flat Euclidean distance in decimal degrees, used by the strict resolver cutoff.
#[must_use]
pub fn euclidean_degrees(a: Coordinate, b: Coordinate) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng)
}
