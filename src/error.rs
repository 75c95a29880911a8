//! Error types for configuration and data import.
//!
//! Clustering itself never fails: missing markers, early passes and undefined
//! viewports are reported as `false`/`None` or skipped. Errors only come from
//! the edges of the crate, where user-provided settings or documents are parsed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(String),

    #[cfg(feature = "geojson")]
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
