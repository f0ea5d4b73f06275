use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Region data error: {0}")]
    Data(#[from] sentinel_geo_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;

/// Failure of the external reverse-geocoding collaborator.
///
/// Never propagated past [`crate::RegionResolver::infer_region`].
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Reverse geocoder unreachable: {0}")]
    Unreachable(String),
    #[error("Reverse geocoder timed out after {0} ms")]
    Timeout(u64),
    #[error("Reverse geocoder returned no address")]
    NoAddress,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
