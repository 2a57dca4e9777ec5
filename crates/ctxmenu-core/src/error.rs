//! Error types for ctxmenu-core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving menu configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid TOML or has unknown fields.
    #[error("Invalid menu options: {0}")]
    Parse(#[from] toml::de::Error),

    /// Options could not be written back out as TOML.
    #[error("Failed to serialize menu options: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration file does not exist.
    #[error("Menu options not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Result alias for ctxmenu-core operations.
pub type Result<T> = std::result::Result<T, Error>;
