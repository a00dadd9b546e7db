pub mod app_config;
pub mod candidate;
pub mod config;

pub use app_config::{AppConfig, ClientConfig, Environment};
pub use candidate::{Candidate, Coordinates, PhotoRef};
pub use config::{load_app_config, load_app_config_from_env, load_client_config};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}
