use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving module references or writing documentation.
#[derive(Error, Debug)]
pub enum DocketError {
    /// A module reference could not be resolved to a documentable package.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// No Cargo.toml was found for the given location.
    #[error("failed to find Cargo.toml in the current directory or any parent directories")]
    ManifestNotFound,

    /// A Cargo.toml manifest exists but could not be parsed.
    #[error("failed to parse manifest: {0}")]
    ManifestParse(String),

    /// The module reference was syntactically invalid.
    #[error("invalid module reference: {0}")]
    InvalidTarget(String),

    /// The version attached to a module reference was not valid semver.
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    /// Cargo failed while fetching or inspecting dependencies.
    #[error("cargo error: {0}")]
    Cargo(#[from] anyhow::Error),

    /// rustdoc JSON generation failed for a resolved package.
    #[error("failed to generate documentation data: {0}")]
    Generate(String),

    /// The rustdoc JSON output could not be deserialized.
    #[error("failed to parse documentation JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A file read or write failed during rendering.
    #[error("failed to access file: {0}")]
    FileRead(#[from] std::io::Error),

    /// A rendered page could not be produced.
    #[error("failed to render documentation to {path}: {reason}")]
    Render {
        /// Output location involved in the failure.
        path: PathBuf,
        /// Description of what went wrong.
        reason: String,
    },

    /// A declaration snippet could not be normalized through rustfmt.
    #[error("formatting error: {0}")]
    Format(#[from] rust_format::Error),

    /// Syntax highlighting of a declaration snippet failed.
    #[error("highlighting error: {0}")]
    Highlight(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DocketError>;
