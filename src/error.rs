// src/error.rs

use thiserror::Error;

/// Core error types for elm-vendor
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest key is not of the form "namespace/name"
    #[error("Invalid package key '{0}': expected exactly one '/' between namespace and name")]
    ManifestKey(String),

    /// Config repository field is not in owner/name form
    #[error("Repository '{0}' is not in 'owner/name' form")]
    RepositoryFormat(String),

    /// Config files disagree about the project repository
    #[error("Config files disagree on repository: '{0}' vs '{1}'")]
    RepositoryMismatch(String, String),

    /// A config file is missing a required field
    #[error("Missing or malformed '{field}' in {path}")]
    ConfigField { path: String, field: String },

    /// Archive download failure
    #[error("Download error: {0}")]
    Download(String),

    /// Corrupt or unsafe archive
    #[error("Archive error: {0}")]
    Archive(String),

    /// JSON parse or serialize errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using elm-vendor's Error type
pub type Result<T> = std::result::Result<T, Error>;
