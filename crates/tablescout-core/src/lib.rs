mod app_config;
mod config;
pub mod geo;
pub mod restaurants;

pub use app_config::{AppConfig, Environment, RadiusGrowth};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::SearchCenter;
pub use restaurants::{load_restaurants, Restaurant, RestaurantHit, RestaurantSeed, RestaurantsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read restaurants file {path}: {source}")]
    RestaurantsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse restaurants file: {0}")]
    RestaurantsFileParse(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Input validation failures for search parameters and coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("latitude must be a finite value between -90 and 90, got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be a finite value between -180 and 180, got {0}")]
    InvalidLongitude(f64),
    #[error("{field} must be {expectation}, got {value}")]
    InvalidRadius {
        field: &'static str,
        expectation: &'static str,
        value: f64,
    },
    #[error("{0}")]
    InvalidParameter(String),
}
