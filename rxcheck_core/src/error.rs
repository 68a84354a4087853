//! Error types for the rxcheck_core library.
//!
//! Lookups never fail; unknown substances simply yield nothing. Errors only
//! arise at the edges: configuration files, output serialisation, and
//! analyses that were not given enough recognised substances.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rxcheck_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static table validation error
    #[error("Catalogue validation error: {0}")]
    CatalogueValidation(String),

    /// Too few recognised substances for the requested analysis
    #[error("at least {needed} recognised substance(s) required for {analysis}, found {found}")]
    InsufficientSubstances {
        analysis: &'static str,
        needed: usize,
        found: usize,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
